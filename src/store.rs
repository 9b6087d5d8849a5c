use crate::types::{Appointment, AppointmentSlot, AppointmentStatus, Caregiver};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database connection error: {0}")]
    Connection(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Persistence seam for the booking workflow. Implementations return
/// ordered sequences (caregivers by experience descending, slots by
/// date and start time, appointments by date and time) so callers do
/// not re-sort.
///
/// `claim_slot` and `update_status_if` are the conditional-update
/// primitives the booking correctness rests on: both report whether
/// the predicate still held, and implementations must make the check
/// and the write a single atomic step.
pub trait BookingStore: Clone + Send + Sync + 'static {
    fn caregivers(&self) -> Result<Vec<Caregiver>, StoreError>;
    fn caregiver(&self, id: Uuid) -> Result<Option<Caregiver>, StoreError>;

    fn slot(&self, id: Uuid) -> Result<Option<AppointmentSlot>, StoreError>;
    fn available_slots(
        &self,
        caregiver_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, StoreError>;
    fn slots_for(&self, caregiver_id: Uuid) -> Result<Vec<AppointmentSlot>, StoreError>;

    /// Flips `is_available` to false only if it is still true. Returns
    /// whether the claim matched; `false` covers both an already-booked
    /// and a deleted slot.
    fn claim_slot(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Compensation path of a failed booking: puts a claimed slot back
    /// on the market.
    fn release_slot(&self, id: Uuid) -> Result<(), StoreError>;

    fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;
    fn appointments(&self, caregiver_id: Uuid) -> Result<Vec<Appointment>, StoreError>;

    /// Single-row compare-and-set on the appointment status. Returns
    /// whether the row still carried `expected`.
    fn update_status_if(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<bool, StoreError>;
}
