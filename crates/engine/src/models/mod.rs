pub mod record;

pub use record::{
    CertificationEntry, CustomSection, EducationEntry, ExperienceEntry, ProjectEntry, Skills,
    StructuredRecord,
};
