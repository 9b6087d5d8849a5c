use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::local_store::LocalStore;
use crate::store::{BookingStore, StoreError};
use crate::types::{Appointment, AppointmentSlot, AppointmentStatus, Caregiver};

/// Store wrapper for tests: delegates to a [`LocalStore`], counts
/// every call, and can be told to fail individual write operations.
pub struct CountingStoreInner {
    pub data: LocalStore,
    pub fail_insert_appointment: AtomicBool,
    pub fail_claim_slot: AtomicBool,
    pub calls_to_caregivers: AtomicU64,
    pub calls_to_available_slots: AtomicU64,
    pub calls_to_claim_slot: AtomicU64,
    pub calls_to_release_slot: AtomicU64,
    pub calls_to_insert_appointment: AtomicU64,
    pub calls_to_appointments: AtomicU64,
    pub calls_to_update_status_if: AtomicU64,
}

#[derive(Clone)]
pub struct CountingStore(pub Arc<CountingStoreInner>);

impl CountingStore {
    pub fn new() -> Self {
        Self(Arc::new(CountingStoreInner {
            data: LocalStore::default(),
            fail_insert_appointment: AtomicBool::new(false),
            fail_claim_slot: AtomicBool::new(false),
            calls_to_caregivers: AtomicU64::default(),
            calls_to_available_slots: AtomicU64::default(),
            calls_to_claim_slot: AtomicU64::default(),
            calls_to_release_slot: AtomicU64::default(),
            calls_to_insert_appointment: AtomicU64::default(),
            calls_to_appointments: AtomicU64::default(),
            calls_to_update_status_if: AtomicU64::default(),
        }))
    }

    /// One available caregiver with one slot; returns the slot id.
    pub fn seed_slot(&self) -> Uuid {
        self.seed_caregiver_and_slot().1
    }

    pub fn seed_caregiver_and_slot(&self) -> (Uuid, Uuid) {
        let caregiver = Caregiver {
            id: Uuid::new_v4(),
            name: "Dr. Sarah Miller".into(),
            email: "sarah@example.com".into(),
            specialization: vec!["dogs".into(), "cats".into()],
            bio: None,
            experience_years: 8,
            is_available: true,
        };
        let caregiver_id = caregiver.id;
        self.0.data.add_caregiver(caregiver);
        let slot_id = self.0.data.add_slot(
            caregiver_id,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );
        (caregiver_id, slot_id)
    }
}

impl BookingStore for CountingStore {
    fn caregivers(&self) -> Result<Vec<Caregiver>, StoreError> {
        self.0.calls_to_caregivers.fetch_add(1, Ordering::SeqCst);
        self.0.data.caregivers()
    }

    fn caregiver(&self, id: Uuid) -> Result<Option<Caregiver>, StoreError> {
        self.0.data.caregiver(id)
    }

    fn slot(&self, id: Uuid) -> Result<Option<AppointmentSlot>, StoreError> {
        self.0.data.slot(id)
    }

    fn available_slots(
        &self,
        caregiver_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, StoreError> {
        self.0
            .calls_to_available_slots
            .fetch_add(1, Ordering::SeqCst);
        self.0.data.available_slots(caregiver_id, from_date)
    }

    fn slots_for(&self, caregiver_id: Uuid) -> Result<Vec<AppointmentSlot>, StoreError> {
        self.0.data.slots_for(caregiver_id)
    }

    fn claim_slot(&self, id: Uuid) -> Result<bool, StoreError> {
        self.0.calls_to_claim_slot.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_claim_slot.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("claim_slot is set to fail".into()));
        }
        self.0.data.claim_slot(id)
    }

    fn release_slot(&self, id: Uuid) -> Result<(), StoreError> {
        self.0.calls_to_release_slot.fetch_add(1, Ordering::SeqCst);
        self.0.data.release_slot(id)
    }

    fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        self.0
            .calls_to_insert_appointment
            .fetch_add(1, Ordering::SeqCst);
        if self.0.fail_insert_appointment.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "insert_appointment is set to fail".into(),
            ));
        }
        self.0.data.insert_appointment(appointment)
    }

    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        self.0.data.appointment(id)
    }

    fn appointments(&self, caregiver_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        self.0.calls_to_appointments.fetch_add(1, Ordering::SeqCst);
        self.0.data.appointments(caregiver_id)
    }

    fn update_status_if(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<bool, StoreError> {
        self.0
            .calls_to_update_status_if
            .fetch_add(1, Ordering::SeqCst);
        self.0.data.update_status_if(id, expected, new_status)
    }
}
