pub mod report_composer;
