use folio::report::{ContentType, ReportFilter, ReportSummary};

use super::*;

async fn seeded() -> (Folio, TempDir) {
  let (folio, dir) = create_test_folio().await;
  let me = Identity::from("teacher-1");
  let drafts = [
    PaperDraft::new("Quantum \"Dots\"")
      .with_department(Department::Eced)
      .with_status(Status::Published)
      .with_collaborators(["Ann", "Bo"])
      .with_keywords(["optics", "nano"])
      .with_upload_date(date(2023, 9, 1))
      .with_publish_date(date(2023, 12, 24))
      .with_pdf_url("https://cdn.example/q.pdf"),
    PaperDraft::new("Soil Mechanics")
      .with_department(Department::Ced)
      .with_upload_date(date(2024, 2, 2)),
    PaperDraft::new("Untitled Notes").with_upload_date(date(2024, 2, 3)),
  ];
  for draft in &drafts {
    folio.papers().create(Some(&me), draft).await.unwrap();
  }
  (folio, dir)
}

#[traced_test]
#[tokio::test]
async fn test_delimited_export() -> TestResult<()> {
  let (folio, _dir) = seeded().await;
  let papers = folio.papers().list_all().await?;

  let csv = String::from_utf8(report::export_delimited(&papers))?;
  let lines: Vec<_> = csv.lines().collect();
  assert_eq!(lines.len(), 4);
  assert_eq!(lines[0], report::DELIMITED_HEADER.join(","));
  let quantum = lines.iter().find(|l| l.starts_with("\"Quantum")).unwrap();
  assert_eq!(
    *quantum,
    "\"Quantum \"\"Dots\"\"\",\"Electronics & Communication Engineering\",\"published\",\"Ann; \
     Bo\",\"optics; nano\",\"2023-09-01\",\"2023-12-24\",\"\""
  );
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_structured_export_and_summary() -> TestResult<()> {
  let (folio, _dir) = seeded().await;
  let papers = folio.papers().list_all().await?;

  let filter = ReportFilter { content_type: ContentType::MetadataOnly, ..Default::default() };
  let metadata_only = report::apply_report_filter(&papers, &filter);
  assert_eq!(metadata_only.len(), 2);

  let json: serde_json::Value = serde_json::from_slice(&report::export_structured(&papers)?)?;
  assert_eq!(json.as_array().map(Vec::len), Some(3));

  let summary = ReportSummary::from_papers(&papers);
  assert_eq!(summary.total, 3);
  assert_eq!(summary.count(Status::Draft), 2);
  assert_eq!(summary.count(Status::Published), 1);
  assert_eq!(summary.unassigned, 1);
  assert_eq!(summary.with_pdf, 1);
  Ok(())
}
