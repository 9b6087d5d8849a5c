use crate::store::{BookingStore, StoreError};
use crate::types::{
    Appointment, AppointmentSlot, AppointmentStatus, BookingRequest, Caregiver, CaregiverFilter,
    Decision,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Malformed input. Nothing was written; the caller fixes the
    /// request and retries.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The slot was booked or removed first. The caller re-lists slots
    /// and picks another; never retried automatically.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The acting caregiver does not own the appointment.
    #[error("not authorized: {0}")]
    Authorization(String),
    /// Transition attempted from a non-pending status.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the invariant that a slot is booked by at most one appointment,
/// and mediates every state transition of slots and appointments. Each
/// call is an independent, stateless operation against the shared
/// store; the store's conditional updates are the only synchronization.
#[derive(Debug, Clone)]
pub struct SlotBookingService<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> SlotBookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Available caregivers, most experienced first, narrowed by the
    /// tag/experience predicate. Plain linear scan, no ranking.
    pub fn list_caregivers(
        &self,
        filter: &CaregiverFilter,
    ) -> Result<Vec<Caregiver>, BookingError> {
        let caregivers = self.store.caregivers()?;
        Ok(caregivers
            .into_iter()
            .filter(|caregiver| filter.matches(caregiver))
            .collect())
    }

    /// A single caregiver profile. Profiles that exist but no longer
    /// accept bookings are hidden, like unknown ids.
    pub fn caregiver(&self, id: Uuid) -> Result<Caregiver, BookingError> {
        match self.store.caregiver(id)? {
            Some(caregiver) if caregiver.is_available => Ok(caregiver),
            _ => Err(BookingError::NotFound(format!("no caregiver {id}"))),
        }
    }

    /// Open slots for a caregiver from `from_date` on, ordered by date
    /// and start time. No slots is an empty list, not an error.
    pub fn list_available_slots(
        &self,
        caregiver_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, BookingError> {
        Ok(self.store.available_slots(caregiver_id, from_date)?)
    }

    /// The booking workflow: validate, atomically claim the slot, then
    /// create the appointment. The claim is the gate — an appointment
    /// is only ever written for a slot this call actually claimed, so
    /// two concurrent bookings of one slot cannot both succeed. If the
    /// appointment insert fails after the claim, the slot is released
    /// again before the original error propagates.
    pub fn book_slot(
        &self,
        slot_id: Uuid,
        details: &BookingRequest,
    ) -> Result<Appointment, BookingError> {
        details
            .validate()
            .map_err(|err| BookingError::Validation(err.to_string()))?;

        let slot = self
            .store
            .slot(slot_id)?
            .ok_or_else(|| BookingError::Conflict(format!("slot {slot_id} no longer exists")))?;

        if !self.store.claim_slot(slot_id)? {
            return Err(BookingError::Conflict(format!(
                "slot {slot_id} is no longer available"
            )));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            caregiver_id: slot.caregiver_id,
            slot_id,
            client_name: details.client_name.clone(),
            client_email: details.client_email.clone(),
            client_phone: details.client_phone.clone(),
            pet_type: details.pet_type.clone(),
            pet_name: details.pet_name.clone(),
            description: details.description.clone(),
            special_requirements: details.special_requirements.clone(),
            appointment_date: slot.date,
            appointment_time: slot.start_time,
            status: AppointmentStatus::Pending,
        };

        if let Err(insert_error) = self.store.insert_appointment(&appointment) {
            // Compensate so the slot is not stranded; the insert error
            // stays the one the caller sees.
            if let Err(release_error) = self.store.release_slot(slot_id) {
                error!(
                    %slot_id,
                    ?release_error,
                    "failed to release slot after appointment insert failed; \
                     slot stays claimed until the reconciliation sweep finds it"
                );
            }
            return Err(insert_error.into());
        }

        info!(
            appointment_id = %appointment.id,
            %slot_id,
            caregiver_id = %appointment.caregiver_id,
            "booked slot"
        );
        Ok(appointment)
    }

    /// One-shot approve/reject by the owning caregiver. The compare-
    /// and-set on `pending` makes a second decision lose instead of
    /// silently overwriting the first.
    pub fn decide(
        &self,
        appointment_id: Uuid,
        decision: Decision,
        acting_caregiver_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        let appointment = self.store.appointment(appointment_id)?.ok_or_else(|| {
            BookingError::NotFound(format!("no appointment {appointment_id}"))
        })?;

        if appointment.caregiver_id != acting_caregiver_id {
            return Err(BookingError::Authorization(format!(
                "appointment {appointment_id} belongs to another caregiver"
            )));
        }

        let new_status = decision.status();
        if !self
            .store
            .update_status_if(appointment_id, AppointmentStatus::Pending, new_status)?
        {
            let current = self
                .store
                .appointment(appointment_id)?
                .map(|appointment| appointment.status)
                .ok_or_else(|| {
                    BookingError::NotFound(format!("no appointment {appointment_id}"))
                })?;
            return Err(BookingError::InvalidState(format!(
                "appointment {appointment_id} is {}, only pending appointments can be decided",
                current.as_str()
            )));
        }

        info!(
            %appointment_id,
            status = new_status.as_str(),
            "appointment decided"
        );
        Ok(Appointment {
            status: new_status,
            ..appointment
        })
    }

    /// A caregiver's appointments ordered by date and time, optionally
    /// narrowed to one status.
    pub fn list_appointments(
        &self,
        caregiver_id: Uuid,
        status_filter: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, BookingError> {
        let appointments = self.store.appointments(caregiver_id)?;
        Ok(match status_filter {
            Some(status) => appointments
                .into_iter()
                .filter(|appointment| appointment.status == status)
                .collect(),
            None => appointments,
        })
    }

    /// Reconciliation sweep: claimed slots with no appointment pointing
    /// at them. Such a slot can only come out of a booking whose
    /// compensation did not run to completion (e.g. a crash between
    /// claim and insert). Report only, no auto-heal.
    pub fn find_stranded_slots(
        &self,
        caregiver_id: Uuid,
    ) -> Result<Vec<AppointmentSlot>, BookingError> {
        let booked_slot_ids: HashSet<Uuid> = self
            .store
            .appointments(caregiver_id)?
            .into_iter()
            .map(|appointment| appointment.slot_id)
            .collect();
        Ok(self
            .store
            .slots_for(caregiver_id)?
            .into_iter()
            .filter(|slot| !slot.is_available && !booked_slot_ids.contains(&slot.id))
            .collect())
    }
}
