use approx::assert_relative_eq;
use chrono::Utc;
use doc_chart_rs::api::{ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES, ChartRequestBuilder, FileValidator};
use doc_chart_rs::core::{ChartParameters, Document, ParameterInput, ProcessingResult};
use doc_chart_rs::error::ValidationError;
use doc_chart_rs::interaction::{ZoomConfig, ZoomState};
use proptest::prelude::*;

fn result() -> ProcessingResult {
    ProcessingResult::new(vec!["length".to_owned(), "mass".to_owned()], "abc.json")
        .expect("result")
}

proptest! {
    #[test]
    fn unsupported_type_and_extension_is_always_rejected(
        mime in prop::option::of("[a-z]{1,10}/[a-z0-9.+-]{1,20}"),
        stem in "[A-Za-z0-9_]{1,12}",
        ext in "[a-z0-9]{1,5}",
    ) {
        let mime_ok = mime.as_deref().is_some_and(|m| ACCEPTED_MIME_TYPES.contains(&m));
        prop_assume!(!mime_ok && !ACCEPTED_EXTENSIONS.contains(&ext.as_str()));

        let document = Document::new(format!("{stem}.{ext}"), mime, Utc::now(), vec![1, 2, 3]);
        let outcome = FileValidator::new().validate(&document);
        let is_unsupported = matches!(outcome, Err(ValidationError::UnsupportedType { .. }));
        prop_assert!(is_unsupported);
    }

    #[test]
    fn accepted_extension_passes_whatever_the_case(
        stem in "[A-Za-z0-9_]{1,12}",
        index in 0usize..3,
        upper in any::<bool>(),
    ) {
        let ext = if upper {
            ACCEPTED_EXTENSIONS[index].to_ascii_uppercase()
        } else {
            ACCEPTED_EXTENSIONS[index].to_owned()
        };
        let document = Document::new(format!("{stem}.{ext}"), None, Utc::now(), Vec::new());
        prop_assert!(FileValidator::new().validate(&document).is_ok());
    }

    #[test]
    fn built_requests_always_have_dimensions_in_range(
        width in any::<u32>(),
        height in any::<u32>(),
    ) {
        let params = ChartParameters { width, height, ..ChartParameters::default() };
        let request = ChartRequestBuilder::build(&result(), &params);
        prop_assert!((300..=1200).contains(&request.width));
        prop_assert!((200..=800).contains(&request.height));
    }

    #[test]
    fn raw_dimension_input_never_escapes_range(
        width in ".{0,12}",
        height in "-?[0-9]{0,7}(\\.[0-9]{0,3})?",
        unit in "[a-z]{0,8}",
    ) {
        let input = ParameterInput {
            unit,
            width,
            height,
            ..ParameterInput::default()
        };
        let request = ChartRequestBuilder::build_from_input(&result(), &input);
        prop_assert!((300..=1200).contains(&request.width));
        prop_assert!((200..=800).contains(&request.height));
    }

    #[test]
    fn zoom_stays_within_bounds(presses in prop::collection::vec(any::<bool>(), 0..80)) {
        let mut zoom = ZoomState::new(ZoomConfig::default());
        for zoom_in in presses {
            let factor = if zoom_in { zoom.zoom_in() } else { zoom.zoom_out() };
            prop_assert!((0.5..=3.0).contains(&factor));
        }
    }
}

#[test]
fn twenty_five_zoom_ins_stop_at_three() {
    let mut zoom = ZoomState::new(ZoomConfig::default());
    for _ in 0..25 {
        assert!(zoom.zoom_in() <= 3.0);
    }
    assert_relative_eq!(zoom.factor(), 3.0);
}

#[test]
fn ten_zoom_outs_stop_at_one_half() {
    let mut zoom = ZoomState::new(ZoomConfig::default());
    for _ in 0..10 {
        assert!(zoom.zoom_out() >= 0.5);
    }
    assert_relative_eq!(zoom.factor(), 0.5);
}
