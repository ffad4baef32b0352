use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::dtos::{CategoryResponseDto, CategoryWithCountDto};
use crate::features::projects::dtos::{BrowseFilter, ProjectDetailDto, ProjectResponseDto};
use crate::features::schedules::dtos::ScheduleResponseDto;

/// Landing page content
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeDto {
    /// Newest projects
    pub featured: Vec<ProjectResponseDto>,
    pub categories: Vec<CategoryResponseDto>,
    /// Schedules that have not started yet, soonest first
    pub upcoming: Vec<ScheduleResponseDto>,
}

/// One page of the project browser; paging is in the response meta
#[derive(Debug, Serialize, ToSchema)]
pub struct BrowseDto {
    pub projects: Vec<ProjectResponseDto>,
    /// Every category, for the filter control
    pub categories: Vec<CategoryResponseDto>,
    /// Filters that were applied
    pub filter: BrowseFilter,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowProjectDto {
    #[serde(flatten)]
    pub project: ProjectDetailDto,
    /// Other projects of the same category
    pub related: Vec<ProjectResponseDto>,
    pub popular_categories: Vec<CategoryWithCountDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowScheduleDto {
    pub schedule: ScheduleResponseDto,
    pub upcoming: Vec<ScheduleResponseDto>,
}

/// Contact form submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Email must be a valid address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 255, message = "Subject must be at most 255 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::lorem::en::Sentence;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn contact(name: &str, email: &str, message: &str) -> ContactDto {
        ContactDto {
            name: name.to_string(),
            email: email.to_string(),
            subject: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_contact_validation() {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let message: String = Sentence(3..10).fake();
        assert!(contact(&name, &email, &message).validate().is_ok());

        let errors = contact("", "not-an-email", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
    }

    #[test]
    fn test_contact_subject_is_bounded() {
        let mut dto = contact("Ana", "ana@example.com", "Hello");
        dto.subject = Some("s".repeat(256));
        assert!(dto.validate().is_err());
    }
}
