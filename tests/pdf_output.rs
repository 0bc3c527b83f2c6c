mod common;

use std::fs;

use serde_json::Value;

use report_paginator::model::ContentBlock;
use report_paginator::{Error, Options, PrintTarget, convert_report_to_pdf, paginate, render_pdf};

#[test]
fn blood_panel_converts_to_pdf_and_plan() {
    let _ = env_logger::builder().is_test(true).try_init();

    let input = common::fixture("blood_panel.xhtml");
    let out = common::output_dir("blood_panel");
    let pdf_path = out.join("generated.pdf");
    let plan_path = out.join("plan.json");

    let pages = convert_report_to_pdf(&input, &pdf_path, Some(&plan_path), &Options::default())
        .expect("conversion succeeds");
    assert_eq!(pages, 6);

    let bytes = fs::read(&pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(common::pdf_page_count(&bytes), 6);

    let plan: Value = serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(plan["page_count"], 6);
    assert_eq!(plan["capacity"], 1000.0);

    let cover = &plan["pages"][0];
    assert_eq!(cover["no_footer"], true);
    assert!(cover["footer"].is_null());

    assert_eq!(plan["pages"][1]["footer"]["text"], "Page 1/5 - Symp report");
    assert_eq!(plan["pages"][1]["used_height"], 950.0);

    let continuation = &plan["pages"][2];
    assert_eq!(continuation["blocks"][0]["kind"], "table_header");
    assert_eq!(continuation["blocks"][0]["repeated"], true);
    assert_eq!(continuation["blocks"][1]["text"], "Sélénium | 95");
    // Footer stamping removed the conclusion's bottom margin.
    assert_eq!(continuation["blocks"][2]["rendered_height"], 120.0);
    assert_eq!(continuation["fragments"][0]["group"], "analyses");
    assert_eq!(continuation["fragments"][0]["index"], 1);
    assert_eq!(continuation["fragments"][0]["continued"], true);

    let advice = &plan["pages"][5]["fragments"];
    assert_eq!(advice.as_array().map(Vec::len), Some(2));
    assert_eq!(advice[1]["group"], "advice~1");
    assert_eq!(advice[1]["classes"], serde_json::json!(["small"]));
}

#[test]
fn disabling_chunking_keeps_long_comment_whole() {
    let input = common::fixture("blood_panel.xhtml");
    let out = common::output_dir("blood_panel_no_chunk");
    let plan_path = out.join("plan.json");

    let options = Options {
        long_comments: None,
        footer: Some("Symp".into()),
        ..Options::default()
    };
    convert_report_to_pdf(&input, &out.join("generated.pdf"), Some(&plan_path), &options)
        .expect("conversion succeeds");

    let plan: Value = serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    let fragments = plan["pages"][5]["fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0]["group"], "advice");
    assert_eq!(plan["pages"][1]["footer"]["text"], "Symp");
}

#[test]
fn render_emits_one_pdf_page_per_plan_page() {
    let blocks: Vec<ContentBlock> = (0..12)
        .map(|i| ContentBlock::text(300.0).with_text(format!("Paragraphe {i} – résultats")))
        .collect();
    let pages = paginate(&blocks, 1000.0);
    assert_eq!(pages.len(), 4);

    let bytes = render_pdf(&pages, &PrintTarget::a4()).expect("render");
    assert_eq!(common::pdf_page_count(&bytes), 4);
}

#[test]
fn empty_plan_renders_an_empty_document() {
    let bytes = render_pdf(&[], &PrintTarget::a4()).expect("render");
    assert_eq!(common::pdf_page_count(&bytes), 0);
}

#[test]
fn zero_capacity_is_rejected() {
    let input = common::fixture("blood_panel.xhtml");
    let out = common::output_dir("zero_capacity");
    let options = Options {
        target: PrintTarget::a4().with_capacity(0.0),
        ..Options::default()
    };
    let result = convert_report_to_pdf(&input, &out.join("generated.pdf"), None, &options);
    assert!(matches!(result, Err(Error::InvalidReport(_))));
}

#[test]
fn missing_input_reports_the_path() {
    let out = common::output_dir("missing");
    let input = out.join("does-not-exist.xhtml");
    match convert_report_to_pdf(&input, &out.join("generated.pdf"), None, &Options::default()) {
        Err(Error::Io(e)) => assert!(e.to_string().contains("does-not-exist.xhtml")),
        other => panic!("expected I/O error, got {other:?}"),
    }
}
