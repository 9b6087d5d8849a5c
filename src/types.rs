use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A service provider (veterinarian or pet-sitter) offering bookable slots.
/// Caregiver records are managed by an external profile process and are
/// read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: Vec<String>,
    pub bio: Option<String>,
    pub experience_years: i32,
    pub is_available: bool,
}

/// A bookable time window owned by exactly one caregiver. `is_available`
/// stays true until exactly one successful booking claims the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: Uuid,
    pub caregiver_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AppointmentStatus::Pending),
            "approved" => Some(AppointmentStatus::Approved),
            "rejected" => Some(AppointmentStatus::Rejected),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    /// The full transition table. `pending` is decided once by the owning
    /// caregiver; `approved` appointments are closed out by an external
    /// process. Everything else is terminal.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Approved)
                | (AppointmentStatus::Pending, AppointmentStatus::Rejected)
                | (AppointmentStatus::Approved, AppointmentStatus::Completed)
                | (AppointmentStatus::Approved, AppointmentStatus::Cancelled)
        )
    }
}

/// The one-shot caregiver decision on a pending appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn status(self) -> AppointmentStatus {
        match self {
            Decision::Approved => AppointmentStatus::Approved,
            Decision::Rejected => AppointmentStatus::Rejected,
        }
    }
}

/// A client's booking request against a slot. Created with status
/// `pending`, advanced only through the transition table above, never
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub caregiver_id: Uuid,
    pub slot_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub pet_type: String,
    pub pet_name: Option<String>,
    pub description: String,
    pub special_requirements: Option<String>,
    // Copied from the claimed slot so listings sort without a join.
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
}

/// Client and pet details submitted with a booking. Validated before any
/// store write happens.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 1, message = "client name must not be empty"))]
    pub client_name: String,
    #[validate(email(message = "client email must be a valid address"))]
    pub client_email: String,
    pub client_phone: Option<String>,
    #[validate(length(min = 1, message = "pet type must not be empty"))]
    pub pet_type: String,
    pub pet_name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub special_requirements: Option<String>,
}

/// Predicate filter over caregiver profiles. Tag filters match if any
/// requested tag appears in the caregiver's specialization set.
#[derive(Debug, Clone, Default)]
pub struct CaregiverFilter {
    pub pet_types: Vec<String>,
    pub specializations: Vec<String>,
    pub min_experience_years: Option<i32>,
}

impl CaregiverFilter {
    pub fn matches(&self, caregiver: &Caregiver) -> bool {
        if !self.pet_types.is_empty()
            && !self
                .pet_types
                .iter()
                .any(|tag| caregiver.specialization.contains(tag))
        {
            return false;
        }
        if !self.specializations.is_empty()
            && !self
                .specializations
                .iter()
                .any(|tag| caregiver.specialization.contains(tag))
        {
            return false;
        }
        if let Some(minimum) = self.min_experience_years {
            if caregiver.experience_years < minimum {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    fn example_caregiver() -> Caregiver {
        Caregiver {
            id: Uuid::new_v4(),
            name: "Dr. Sarah Miller".into(),
            email: "sarah@example.com".into(),
            specialization: vec!["dogs".into(), "cats".into(), "surgery".into()],
            bio: None,
            experience_years: 8,
            is_available: true,
        }
    }

    #[test_case(AppointmentStatus::Pending, AppointmentStatus::Approved, true)]
    #[test_case(AppointmentStatus::Pending, AppointmentStatus::Rejected, true)]
    #[test_case(AppointmentStatus::Approved, AppointmentStatus::Completed, true)]
    #[test_case(AppointmentStatus::Approved, AppointmentStatus::Cancelled, true)]
    #[test_case(AppointmentStatus::Approved, AppointmentStatus::Rejected, false)]
    #[test_case(AppointmentStatus::Rejected, AppointmentStatus::Approved, false)]
    #[test_case(AppointmentStatus::Completed, AppointmentStatus::Cancelled, false)]
    #[test_case(AppointmentStatus::Cancelled, AppointmentStatus::Pending, false)]
    #[test_case(AppointmentStatus::Pending, AppointmentStatus::Completed, false)]
    fn status_transition_table(from: AppointmentStatus, to: AppointmentStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Approved,
            AppointmentStatus::Rejected,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("confirmed"), None);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = CaregiverFilter::default();
        assert!(filter.matches(&example_caregiver()));
    }

    #[test]
    fn filter_intersects_specialization_tags() {
        let caregiver = example_caregiver();

        let mut filter = CaregiverFilter::default();
        filter.specializations = vec!["surgery".into(), "exotic".into()];
        assert!(filter.matches(&caregiver));

        filter.specializations = vec!["birds".into()];
        assert!(!filter.matches(&caregiver));
    }

    #[test]
    fn filter_applies_pet_type_and_experience_bounds() {
        let caregiver = example_caregiver();

        let mut filter = CaregiverFilter::default();
        filter.pet_types = vec!["dogs".into()];
        filter.min_experience_years = Some(5);
        assert!(filter.matches(&caregiver));

        filter.min_experience_years = Some(10);
        assert!(!filter.matches(&caregiver));

        filter.min_experience_years = None;
        filter.pet_types = vec!["reptiles".into()];
        assert!(!filter.matches(&caregiver));
    }

    #[test]
    fn booking_request_requires_client_and_pet_details() {
        let valid = BookingRequest {
            client_name: "Anna Bauer".into(),
            client_email: "anna@example.com".into(),
            client_phone: None,
            pet_type: "dog".into(),
            pet_name: Some("Rex".into()),
            description: "Annual checkup".into(),
            special_requirements: None,
        };
        assert!(valid.validate().is_ok());

        let mut missing_name = valid.clone();
        missing_name.client_name = String::new();
        assert!(missing_name.validate().is_err());

        let mut bad_email = valid.clone();
        bad_email.client_email = "not-an-address".into();
        assert!(bad_email.validate().is_err());

        let mut missing_description = valid;
        missing_description.description = String::new();
        assert!(missing_description.validate().is_err());
    }
}
