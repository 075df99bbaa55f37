use tracing::{debug, warn};

use crate::core::{Document, ProcessingResult};
use crate::error::{WorkflowError, WorkflowResult};
use crate::transport::{ChartService, ServiceResponse};

use super::FileValidator;
use super::response_envelope::{decode_envelope, required_string, string_list};

/// Drives one upload-and-process request for a document.
///
/// Exactly one request is issued per `submit`. Callers keep at most one in
/// flight; nothing here queues or cancels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadCoordinator {
    validator: FileValidator,
}

impl UploadCoordinator {
    #[must_use]
    pub fn new(validator: FileValidator) -> Self {
        Self { validator }
    }

    #[must_use]
    pub fn validator(&self) -> FileValidator {
        self.validator
    }

    /// Validates, uploads and classifies the reply.
    ///
    /// An invalid document never reaches the service.
    pub async fn submit<S: ChartService>(
        &self,
        service: &S,
        document: &Document,
    ) -> WorkflowResult<ProcessingResult> {
        self.validator.validate(document)?;
        debug!(name = document.name(), size = document.size(), "uploading document");

        let response = service.upload_document(document).await.map_err(|err| {
            warn!(name = document.name(), error = %err, "upload transport failure");
            WorkflowError::from(err)
        })?;
        let result = classify_upload_response(&response)?;
        debug!(
            name = document.name(),
            units = result.units().len(),
            data_file = result.data_file(),
            "document processed"
        );
        Ok(result)
    }
}

/// Turns an upload reply into a processing result.
///
/// `units` is required (`null` reads as none found); `data_file` must be a
/// non-empty string.
pub fn classify_upload_response(response: &ServiceResponse) -> WorkflowResult<ProcessingResult> {
    let object = decode_envelope("upload", response)?;
    let units = string_list(&object, "units")?;
    let data_file = required_string(&object, "data_file")?;
    let result = ProcessingResult::new(units, data_file).inspect_err(|violation| {
        warn!(%violation, "upload reply rejected");
    })?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::classify_upload_response;
    use crate::error::{ProtocolViolation, WorkflowError};
    use crate::transport::ServiceResponse;

    #[test]
    fn success_reply_preserves_unit_order() {
        let response = ServiceResponse::new(
            200,
            r#"{"status":"success","units":["length","mass"],"data_file":"abc.json"}"#,
        );
        let result = classify_upload_response(&response).expect("processing result");
        assert_eq!(result.units(), ["length".to_owned(), "mass".to_owned()]);
        assert_eq!(result.data_file(), "abc.json");
    }

    #[test]
    fn missing_data_file_is_a_protocol_error() {
        let response = ServiceResponse::new(200, r#"{"status":"ok","units":["mass"]}"#);
        let err = classify_upload_response(&response).expect_err("no handle");
        assert_eq!(err, WorkflowError::Protocol(ProtocolViolation::MissingField("data_file")));

        let response =
            ServiceResponse::new(200, r#"{"status":"ok","units":["mass"],"data_file":""}"#);
        let err = classify_upload_response(&response).expect_err("empty handle");
        assert_eq!(err, WorkflowError::Protocol(ProtocolViolation::MissingField("data_file")));
    }

    #[test]
    fn missing_units_is_a_protocol_error_but_null_is_empty() {
        let response = ServiceResponse::new(200, r#"{"status":"ok","data_file":"a.json"}"#);
        let err = classify_upload_response(&response).expect_err("no units");
        assert_eq!(err, WorkflowError::Protocol(ProtocolViolation::MissingField("units")));

        let response =
            ServiceResponse::new(200, r#"{"status":"ok","units":null,"data_file":"a.json"}"#);
        let result = classify_upload_response(&response).expect("empty units");
        assert!(!result.has_units());
    }

    #[test]
    fn non_string_units_are_rejected() {
        let response =
            ServiceResponse::new(200, r#"{"status":"ok","units":[1,2],"data_file":"a.json"}"#);
        let err = classify_upload_response(&response).expect_err("numeric units");
        assert!(matches!(
            err,
            WorkflowError::Protocol(ProtocolViolation::UnexpectedShape { field: "units", .. })
        ));
    }
}
