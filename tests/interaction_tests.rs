use chrono::Utc;
use doc_chart_rs::api::{ChartWorkflow, WorkflowConfig};
use doc_chart_rs::core::{ChartArtifact, Document};
use doc_chart_rs::interaction::{HIGHLIGHT_FILL, PointerEventKind, SvgInteractionLayer};
use doc_chart_rs::transport::{ReplayChartService, ServiceResponse};
use futures::executor::block_on;

const LINE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 300">
  <rect x="0" y="0" width="600" height="300" fill="#ffffff"/>
  <polyline points="10,200 60,150 110,90" fill="none" stroke="#333"/>
  <circle class="data-point" cx="10" cy="200" r="4" fill="#1f77b4"><title>Mon: 3.5</title></circle>
  <circle class="data-point" cx="60" cy="150" r="4" fill="#1f77b4" data-category="Tue" data-value="4.25"/>
  <circle class="data-point" cx="110" cy="90" r="4"/>
</svg>"##;

fn artifact() -> ChartArtifact {
    ChartArtifact::from_markup(LINE_SVG, Utc::now()).expect("valid chart")
}

#[test]
fn enhancing_twice_attaches_listeners_once() {
    let layer = SvgInteractionLayer::default();
    let mut chart = layer.render(&artifact()).expect("render");
    assert_eq!(chart.listener_count(), 0);
    assert_eq!(chart.tooltip_count(), 0);

    let first = layer.enhance(&mut chart);
    let after_first = chart.listener_count();
    let second = layer.enhance(&mut chart);

    assert_eq!(first, 4 * 3);
    assert_eq!(second, 0);
    assert_eq!(chart.listener_count(), after_first);
    assert_eq!(chart.tooltip_count(), 1);
    assert!(
        chart
            .listeners()
            .iter()
            .filter(|listener| listener.shape == 2)
            .map(|listener| listener.event)
            .eq([PointerEventKind::Over, PointerEventKind::Move, PointerEventKind::Out])
    );
}

#[test]
fn tooltip_reads_embedded_data_and_tracks_pointer() {
    let layer = SvgInteractionLayer::default();
    let mut chart = layer.render(&artifact()).expect("render");
    layer.enhance(&mut chart);

    let shapes = chart.shapes();
    assert_eq!(shapes[1].tooltip_text(), "Mon: 3.5");
    assert_eq!(shapes[2].tooltip_text(), "Tue: 4.25");
    assert_eq!(shapes[3].tooltip_text(), "Data point: N/A");

    assert!(chart.pointer_over(2, 300.0, 120.0));
    let tooltip = chart.tooltip().expect("tooltip").clone();
    assert!(tooltip.visible);
    assert_eq!(tooltip.text, "Tue: 4.25");
    assert_eq!((tooltip.left_px, tooltip.top_px), (310.0, 130.0));
    assert_eq!(chart.shapes()[2].fill(), Some(HIGHLIGHT_FILL));

    chart.pointer_out(2);
    assert_eq!(chart.shapes()[2].fill(), Some("#1f77b4"));

    // A shape without a declared fill goes back to having none.
    chart.pointer_over(3, 0.0, 0.0);
    chart.pointer_out(3);
    assert_eq!(chart.shapes()[3].fill(), None);
}

#[test]
fn zoom_never_touches_markup_or_view_box() {
    let layer = SvgInteractionLayer::default();
    let mut chart = layer.render(&artifact()).expect("render");

    for _ in 0..25 {
        chart.zoom_in();
    }
    assert_eq!(chart.zoom().transform().as_deref(), Some("scale(3)"));
    assert_eq!(chart.zoom().transform_origin(), "center center");
    assert_eq!(chart.view_box(), Some("0 0 600 300"));

    chart.reset_zoom();
    assert_eq!(chart.zoom().transform(), None);
    assert_eq!(chart.view_box(), Some("0 0 600 300"));
    assert_eq!(chart.markup(), LINE_SVG);
    assert_eq!(chart.intrinsic_size(), Some((600.0, 300.0)));
}

#[test]
fn workflow_routes_pointer_and_zoom_to_current_chart() {
    let service = ReplayChartService::new();
    service.push_upload_reply(Ok(ServiceResponse::new(
        200,
        r#"{"status":"ok","units":["temp"],"data_file":"t.json"}"#,
    )));
    service.push_chart_reply(Ok(ServiceResponse::ok_json(&serde_json::json!({
        "status": "success",
        "svg": LINE_SVG,
    }))));
    let mut workflow = ChartWorkflow::new(service, WorkflowConfig::default()).expect("workflow");

    assert_eq!(workflow.zoom_in(), None);
    assert!(!workflow.pointer_over(0, 0.0, 0.0));

    let doc = Document::new("temps.txt", None, Utc::now(), b"mon 3.5".to_vec());
    block_on(workflow.submit_document(doc)).expect("upload");
    block_on(workflow.generate_chart()).expect("chart");

    assert_eq!(workflow.enhance_chart(), 0);
    let hit = workflow.hit_test(60.0, 151.0).expect("second point");
    assert!(workflow.pointer_over(hit, 5.0, 5.0));
    assert_eq!(workflow.tooltip().map(|t| t.text.as_str()), Some("Tue: 4.25"));
    assert!(workflow.pointer_move(7.0, 9.0));
    assert_eq!(workflow.snapshot().tooltip.map(|t| t.left_px), Some(17.0));

    assert_eq!(workflow.zoom_in(), Some(1.1));
    assert_eq!(workflow.snapshot().zoom_transform.as_deref(), Some("scale(1.1)"));
    workflow.reset_zoom();
    assert_eq!(workflow.snapshot().zoom_factor, 1.0);
}
