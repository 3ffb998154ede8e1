//! Section builders for the SLF report.
//!
//! Every builder is a pure function from input records to layout blocks.
//! Records that cannot be formatted are rendered as an invalid-data marker
//! and reported in [`Section::issues`]; they never abort the section.

use chrono::{DateTime, FixedOffset};

use super::grouping::group_by_category;
use crate::domain::error::AppError;
use crate::domain::photo::Photo;
use crate::domain::project::{Inspection, PersonRef, Project};
use crate::domain::response::ResponseRecord;
use crate::infrastructure::document::{Block, TextStyle};
use crate::shared::locale::{format_number, long_date, long_date_time, parse_date, parse_timestamp};
use crate::shared::text::{format_coordinates, humanize, or_placeholder, EMPTY_VALUE};

pub const REPORT_TITLE: [&str; 2] = [
    "LAPORAN PEMERIKSAAN KELAIKAN FUNGSI",
    "BANGUNAN GEDUNG",
];
pub const REPORT_SUBTITLE: &str = "SERTIFIKAT LAIK FUNGSI (SLF)";

pub const PROJECT_INFO_TITLE: &str = "INFORMASI PROYEK";
pub const INSPECTION_INFO_TITLE: &str = "INFORMASI INSPEKSI";
pub const CHECKLIST_TITLE: &str = "HASIL PEMERIKSAAN CHECKLIST";
pub const SIMAK_TITLE: &str = "DAFTAR SIMAK";
pub const PHOTOS_TITLE: &str = "DOKUMENTASI FOTO";
pub const CONCLUSION_TITLE: &str = "KESIMPULAN DAN REKOMENDASI";

pub const UNKNOWN_UPLOADER: &str = "Unknown";

pub const CONCLUSION_TEMPLATE: [&str; 10] = [
    "Berdasarkan hasil pemeriksaan kelaikan fungsi bangunan gedung yang telah dilaksanakan, \
     tim pengkaji teknis menyimpulkan bahwa bangunan gedung tersebut dinyatakan:",
    "[LAIK FUNGSI / TIDAK LAIK FUNGSI]",
    "Temuan utama:",
    "1. [Uraikan temuan pemeriksaan]",
    "2. [Uraikan temuan pemeriksaan]",
    "Rekomendasi:",
    "1. [Uraikan rekomendasi perbaikan atau pemeliharaan]",
    "2. [Uraikan rekomendasi perbaikan atau pemeliharaan]",
    "Demikian laporan ini dibuat untuk dapat dipergunakan sebagaimana mestinya.",
    "[Tempat], [Tanggal]                [Nama dan tanda tangan tenaga ahli]",
];

pub const FOOTER_TEXT: &str = "Laporan ini disusun berdasarkan Peraturan Pemerintah Nomor 16 \
     Tahun 2021 tentang Peraturan Pelaksanaan Undang-Undang Nomor 28 Tahun 2002 tentang \
     Bangunan Gedung";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Header,
    ProjectInfo,
    InspectionInfo,
    Checklist,
    Simak,
    Photos,
    Conclusion,
    Footer,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::ProjectInfo => "project_info",
            Self::InspectionInfo => "inspection_info",
            Self::Checklist => "checklist",
            Self::Simak => "simak",
            Self::Photos => "photos",
            Self::Conclusion => "conclusion",
            Self::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub stage: Stage,
    pub blocks: Vec<Block>,
    pub issues: Vec<AppError>,
}

impl Section {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            blocks: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn field(&mut self, label: &str, value: impl AsRef<str>) {
        self.push(Block::text(
            format!("{}: {}", label, value.as_ref()),
            field_style(),
        ));
    }

    /// Records a formatting failure and returns the marker printed in its place.
    fn invalid(&mut self, record_id: &str, reason: impl Into<String>) -> String {
        let reason = reason.into();
        let marker = invalid_marker(&reason);
        self.issues
            .push(AppError::render(self.stage.as_str(), record_id, reason));
        marker
    }

    /// Text of every block, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.blocks.iter().filter_map(Block::as_text).collect()
    }
}

/// Values shared by all builders of one report.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub generated_at: DateTime<FixedOffset>,
    pub timezone: FixedOffset,
}

pub fn invalid_marker(reason: &str) -> String {
    format!("[data tidak valid: {}]", reason)
}

fn title_style() -> TextStyle {
    TextStyle::body(16.0).bold().centered()
}

fn section_title_style() -> TextStyle {
    TextStyle::body(13.0).bold()
}

fn field_style() -> TextStyle {
    TextStyle::body(10.0).indented(10.0)
}

fn section_heading(section: &mut Section, title: &str) {
    section.push(Block::text(title, section_title_style()));
    section.push(Block::Space(4.0));
}

fn person(reference: Option<&PersonRef>) -> String {
    or_placeholder(reference.and_then(PersonRef::display_name))
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{} {}", format_number(value), unit),
        _ => EMPTY_VALUE.to_string(),
    }
}

pub fn header(project: &Project, ctx: &RenderContext) -> Section {
    let mut section = Section::new(Stage::Header);
    for line in REPORT_TITLE {
        section.push(Block::text(line, title_style()));
    }
    section.push(Block::text(
        REPORT_SUBTITLE,
        TextStyle::body(14.0).bold().centered(),
    ));
    section.push(Block::Space(8.0));
    section.push(Block::text(
        format!("ID Proyek: {}", project.id),
        TextStyle::body(10.0).centered(),
    ));
    section.push(Block::text(
        format!("Tanggal: {}", long_date(&ctx.generated_at)),
        TextStyle::body(10.0).centered(),
    ));
    section.push(Block::Rule);
    section.push(Block::Space(10.0));
    section
}

pub fn project_info(project: &Project) -> Section {
    let mut section = Section::new(Stage::ProjectInfo);
    section_heading(&mut section, PROJECT_INFO_TITLE);

    let coordinates = match (project.latitude, project.longitude) {
        (Some(lat), Some(lon)) => format_coordinates(lat, lon),
        _ => EMPTY_VALUE.to_string(),
    };
    let floors = project
        .floors
        .map(|floors| floors.to_string())
        .unwrap_or_else(|| EMPTY_VALUE.to_string());

    section.field("Nama Proyek", or_placeholder(Some(project.name.as_str())));
    section.field("Pemilik", or_placeholder(project.owner.as_deref()));
    section.field("Alamat", or_placeholder(project.address.as_deref()));
    section.field(
        "Fungsi Bangunan",
        humanize(&or_placeholder(project.building_function.as_deref())),
    );
    section.field("Jumlah Lantai", floors);
    section.field("Tinggi Bangunan", with_unit(project.height, "meter"));
    section.field("Luas Bangunan", with_unit(project.area, "m²"));
    section.field("Lokasi", or_placeholder(project.location.as_deref()));
    section.field("Koordinat", coordinates);
    section.field(
        "Jenis Permohonan",
        humanize(&or_placeholder(project.request_type.as_deref())),
    );
    section.push(Block::Space(10.0));
    section
}

pub fn inspection_info(inspection: &Inspection, ctx: &RenderContext) -> Section {
    let mut section = Section::new(Stage::InspectionInfo);
    section_heading(&mut section, INSPECTION_INFO_TITLE);

    let date = match inspection.scheduled_date.as_deref().map(str::trim) {
        None | Some("") => EMPTY_VALUE.to_string(),
        Some(raw) => match parse_date(raw, &ctx.timezone) {
            Ok(date) => long_date(&date),
            Err(reason) => section.invalid(&inspection.id, reason),
        },
    };

    section.field("Tanggal Inspeksi", date);
    section.field("Status", humanize(inspection.status.as_str()));
    section.field("Inspektur", person(inspection.inspector.as_ref()));
    section.field("Drafter", person(inspection.drafter.as_ref()));
    section.push(Block::Space(10.0));
    section
}

pub fn checklist(responses: &[ResponseRecord]) -> Section {
    response_list(Stage::Checklist, CHECKLIST_TITLE, responses)
}

pub fn simak(responses: &[ResponseRecord]) -> Section {
    let mut section = response_list(Stage::Simak, SIMAK_TITLE, responses);
    section.blocks.insert(0, Block::PageBreak);
    section
}

fn response_list(stage: Stage, title: &str, responses: &[ResponseRecord]) -> Section {
    let mut section = Section::new(stage);
    section_heading(&mut section, title);

    for (index, group) in group_by_category(responses).iter().enumerate() {
        let label = if group.category.trim().is_empty() {
            "LAINNYA".to_string()
        } else {
            humanize(group.category).to_uppercase()
        };
        section.push(Block::text(
            format!("{}. {}", index + 1, label),
            TextStyle::body(11.0).bold(),
        ));

        for response in &group.responses {
            let heading = match (response.item.code.trim(), response.item.description.trim()) {
                ("", description) => description.to_string(),
                (code, "") => code.to_string(),
                (code, description) => format!("{} - {}", code, description),
            };
            section.push(Block::text(heading, TextStyle::body(10.0).bold().indented(15.0)));

            match response.fields() {
                Ok(fields) => {
                    for (name, value) in fields.iter().filter(|(_, value)| !value.is_empty()) {
                        section.push(Block::text(
                            format!("{}: {}", humanize(name), value.render()),
                            TextStyle::body(9.0).indented(25.0),
                        ));
                    }
                }
                Err(reason) => {
                    let marker = section.invalid(&response.id, reason);
                    section.push(Block::text(marker, TextStyle::body(9.0).indented(25.0)));
                }
            }
            section.push(Block::Space(4.0));
        }
        section.push(Block::Space(6.0));
    }

    section
}

pub fn photos(photos: &[Photo], ctx: &RenderContext) -> Section {
    let mut section = Section::new(Stage::Photos);
    section.push(Block::PageBreak);
    section_heading(&mut section, PHOTOS_TITLE);
    section.push(Block::text(
        format!("Total Foto: {}", photos.len()),
        TextStyle::body(10.0),
    ));
    section.push(Block::Space(6.0));

    for (index, photo) in photos.iter().enumerate() {
        let caption = photo
            .caption()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Foto {}", index + 1));
        section.push(Block::text(caption, TextStyle::body(10.0).bold()));

        if let Some(floor) = photo.floor.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            section.field("Lantai", floor);
        }
        if let Some((lat, lon)) = photo.coordinates() {
            section.field("Koordinat", format_coordinates(lat, lon));
        }

        let uploader = photo
            .uploaded_by
            .as_ref()
            .and_then(PersonRef::display_name)
            .unwrap_or(UNKNOWN_UPLOADER)
            .to_string();
        section.field("Diunggah oleh", uploader);

        let uploaded_at = if photo.created_at.trim().is_empty() {
            EMPTY_VALUE.to_string()
        } else {
            match parse_timestamp(&photo.created_at, &ctx.timezone) {
                Ok(at) => long_date_time(&at),
                Err(reason) => section.invalid(&photo.id, reason),
            }
        };
        section.field("Waktu Unggah", uploaded_at);
        section.push(Block::Space(8.0));
    }

    section
}

pub fn conclusion() -> Section {
    let mut section = Section::new(Stage::Conclusion);
    section.push(Block::PageBreak);
    section_heading(&mut section, CONCLUSION_TITLE);
    for line in CONCLUSION_TEMPLATE {
        section.push(Block::text(line, TextStyle::body(10.0)));
        section.push(Block::Space(4.0));
    }
    section
}

pub fn footer() -> Section {
    let mut section = Section::new(Stage::Footer);
    section.push(Block::Footer {
        text: FOOTER_TEXT.to_string(),
        style: TextStyle::body(8.0).centered(),
    });
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::InspectionStatus;
    use crate::domain::response::ResponseItem;
    use crate::shared::locale::offset_from_minutes;
    use serde_json::json;

    fn ctx() -> RenderContext {
        let timezone = offset_from_minutes(420).unwrap();
        RenderContext {
            generated_at: DateTime::parse_from_rfc3339("2024-07-15T09:30:00+07:00").unwrap(),
            timezone,
        }
    }

    fn project() -> Project {
        Project {
            id: "PRJ-001".into(),
            name: "Gedung Kantor Dinas".into(),
            owner: Some("Pemerintah Kota".into()),
            building_function: Some("fungsi_usaha".into()),
            floors: Some(5),
            height: Some(21.5),
            area: Some(1250.5),
            latitude: Some(-6.20884412),
            longitude: Some(106.8456001),
            request_type: Some("perpanjangan_slf".into()),
            ..Default::default()
        }
    }

    fn response(id: &str, category: &str, payload: serde_json::Value) -> ResponseRecord {
        ResponseRecord {
            id: id.into(),
            item: ResponseItem {
                code: format!("K-{}", id),
                description: "Kondisi elemen".into(),
                category: category.into(),
            },
            response: payload.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_header_has_title_id_and_long_date() {
        let section = header(&project(), &ctx());
        let texts = section.texts();
        assert_eq!(texts[0], REPORT_TITLE[0]);
        assert!(texts.contains(&"ID Proyek: PRJ-001"));
        assert!(texts.contains(&"Tanggal: 15 Juli 2024"));
        assert!(section.blocks.contains(&Block::Rule));
    }

    #[test]
    fn test_project_info_units_and_placeholders() {
        let section = project_info(&project());
        let texts = section.texts();
        assert!(texts.contains(&"Tinggi Bangunan: 21,5 meter"));
        assert!(texts.contains(&"Luas Bangunan: 1.250,5 m²"));
        assert!(texts.contains(&"Alamat: -"));
        assert!(texts.contains(&"Koordinat: -6.208844, 106.845600"));
        assert!(texts.contains(&"Jenis Permohonan: perpanjangan slf"));
        assert!(texts.contains(&"Fungsi Bangunan: fungsi usaha"));
        assert!(texts.contains(&"Jumlah Lantai: 5"));
    }

    #[test]
    fn test_project_info_missing_measurements() {
        let mut project = project();
        project.height = None;
        project.area = None;
        project.longitude = None;
        let section = project_info(&project);
        let texts = section.texts();
        assert!(texts.contains(&"Tinggi Bangunan: -"));
        assert!(texts.contains(&"Luas Bangunan: -"));
        assert!(texts.contains(&"Koordinat: -"));
    }

    #[test]
    fn test_inspection_info_humanizes_status() {
        let inspection = Inspection {
            id: "insp-1".into(),
            scheduled_date: Some("2024-07-20".into()),
            status: InspectionStatus::InProgress,
            inspector: Some(PersonRef::named("Budi Santoso")),
            drafter: None,
        };
        let section = inspection_info(&inspection, &ctx());
        let texts = section.texts();
        assert!(texts.contains(&"Status: in progress"));
        assert!(texts.contains(&"Tanggal Inspeksi: 20 Juli 2024"));
        assert!(texts.contains(&"Inspektur: Budi Santoso"));
        assert!(texts.contains(&"Drafter: -"));
        assert!(section.issues.is_empty());
    }

    #[test]
    fn test_malformed_inspection_date_is_isolated() {
        let inspection = Inspection {
            id: "insp-2".into(),
            scheduled_date: Some("besok pagi".into()),
            status: InspectionStatus::Scheduled,
            inspector: None,
            drafter: None,
        };
        let section = inspection_info(&inspection, &ctx());
        assert_eq!(section.issues.len(), 1);
        assert!(section
            .texts()
            .iter()
            .any(|t| t.starts_with("Tanggal Inspeksi: [data tidak valid")));
        assert!(section.texts().contains(&"Status: scheduled"));
    }

    #[test]
    fn test_checklist_groups_and_renders_fields() {
        let responses = vec![
            response("1", "struktur", json!({ "kondisi_umum": "baik", "catatan": "" })),
            response("2", "arsitektur", json!({ "kerusakan": ["retak", "lembab"] })),
            response("3", "struktur", json!({ "nilai": 4, "foto": null })),
        ];
        let section = checklist(&responses);
        let texts = section.texts();

        let pos = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();
        assert!(pos(CHECKLIST_TITLE) < pos("1. STRUKTUR"));
        assert!(pos("1. STRUKTUR") < pos("K-1 - Kondisi elemen"));
        assert!(pos("K-1 - Kondisi elemen") < pos("K-3 - Kondisi elemen"));
        assert!(pos("K-3 - Kondisi elemen") < pos("2. ARSITEKTUR"));
        assert!(texts.contains(&"kondisi umum: baik"));
        assert!(texts.contains(&"kerusakan: retak, lembab"));
        assert!(texts.contains(&"nilai: 4"));
        assert!(!texts.iter().any(|t| t.starts_with("catatan")));
        assert!(!texts.iter().any(|t| t.starts_with("foto")));
        assert!(!section.blocks.contains(&Block::PageBreak));
    }

    #[test]
    fn test_category_headings_are_not_duplicated() {
        let responses = vec![
            response("1", "Struktur", json!({ "a": "x" })),
            response("2", "", json!({ "b": "y" })),
            response("3", "struktur ", json!({ "c": "z" })),
            response("4", "  ", json!({ "d": "w" })),
        ];
        let section = checklist(&responses);
        let headings: Vec<&str> = section
            .texts()
            .into_iter()
            .filter(|t| t.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(headings, vec!["1. STRUKTUR", "2. LAINNYA"]);
    }

    #[test]
    fn test_malformed_payload_only_marks_its_record() {
        let responses = vec![
            response("bad", "struktur", json!({ "detail": { "nested": true } })),
            response("good", "struktur", json!({ "kondisi": "baik" })),
        ];
        let section = checklist(&responses);
        assert_eq!(section.issues.len(), 1);
        match &section.issues[0] {
            AppError::Render {
                stage, record_id, ..
            } => {
                assert_eq!(stage, "checklist");
                assert_eq!(record_id, "bad");
            }
            other => panic!("unexpected issue: {:?}", other),
        }
        assert!(section.texts().contains(&"kondisi: baik"));
    }

    #[test]
    fn test_simak_starts_on_new_page() {
        let section = simak(&[response("1", "administrasi", json!({ "ada": true }))]);
        assert_eq!(section.blocks[0], Block::PageBreak);
        assert!(section.texts().contains(&SIMAK_TITLE));
        assert!(section.texts().contains(&"ada: Ya"));
    }

    #[test]
    fn test_malformed_photo_timestamp_is_isolated() {
        let photos = vec![
            Photo {
                id: "p-bad".into(),
                caption: Some("Tangga darurat".into()),
                created_at: "kemarin sore".into(),
                ..Default::default()
            },
            Photo {
                id: "p-ok".into(),
                caption: Some("Ruang panel".into()),
                created_at: "2024-07-15T07:05:00Z".into(),
                ..Default::default()
            },
        ];
        let section = photos_section(&photos);
        let texts = section.texts();

        assert!(texts
            .iter()
            .any(|t| t.starts_with("Waktu Unggah: [data tidak valid: unrecognized timestamp")));
        assert_eq!(section.issues.len(), 1);
        match &section.issues[0] {
            AppError::Render {
                stage, record_id, ..
            } => {
                assert_eq!(stage, "photos");
                assert_eq!(record_id, "p-bad");
            }
            other => panic!("unexpected issue: {:?}", other),
        }

        let later = texts.iter().position(|t| *t == "Ruang panel").unwrap();
        assert!(texts[later..].contains(&"Waktu Unggah: 15 Juli 2024 14.05"));
    }

    #[test]
    fn test_photo_fallbacks() {
        let photos = vec![
            Photo {
                id: "p1".into(),
                caption: Some("Tampak depan".into()),
                floor: Some("Lantai 1".into()),
                latitude: Some(-6.20884412),
                longitude: Some(106.8456001),
                uploaded_by: Some(PersonRef::named("Sari")),
                created_at: "2024-07-15T07:05:00Z".into(),
            },
            Photo {
                id: "p2".into(),
                latitude: Some(-6.2),
                created_at: "2024-07-15T07:06:00Z".into(),
                ..Default::default()
            },
            Photo {
                id: "p3".into(),
                caption: Some("   ".into()),
                created_at: "2024-07-15T07:07:00Z".into(),
                ..Default::default()
            },
        ];
        let section = photos_section(&photos);
        let texts = section.texts();
        assert!(texts.contains(&"Total Foto: 3"));
        assert!(texts.contains(&"Tampak depan"));
        assert!(texts.contains(&"Lantai: Lantai 1"));
        assert!(texts.contains(&"Koordinat: -6.208844, 106.845600"));
        assert!(texts.contains(&"Diunggah oleh: Sari"));
        assert!(texts.contains(&"Waktu Unggah: 15 Juli 2024 14.05"));
        assert!(texts.contains(&"Foto 2"));
        assert!(texts.contains(&"Foto 3"));
        assert_eq!(
            texts.iter().filter(|t| t.starts_with("Koordinat")).count(),
            1
        );
        assert_eq!(
            texts
                .iter()
                .filter(|t| **t == "Diunggah oleh: Unknown")
                .count(),
            2
        );
        assert_eq!(section.blocks[0], Block::PageBreak);
    }

    fn photos_section(items: &[Photo]) -> Section {
        photos(items, &ctx())
    }

    #[test]
    fn test_conclusion_keeps_placeholders() {
        let section = conclusion();
        assert_eq!(section.blocks[0], Block::PageBreak);
        assert!(section.texts().contains(&"[LAIK FUNGSI / TIDAK LAIK FUNGSI]"));
    }

    #[test]
    fn test_footer_is_pinned_block() {
        let section = footer();
        assert!(matches!(section.blocks.as_slice(), [Block::Footer { .. }]));
    }
}
