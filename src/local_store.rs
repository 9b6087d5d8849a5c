use crate::store::{BookingStore, StoreError};
use crate::types::{Appointment, AppointmentSlot, AppointmentStatus, Caregiver};
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// In-memory store for running without a database. All tables live
/// behind one mutex, so every conditional update is trivially atomic.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    caregivers: HashMap<Uuid, Caregiver>,
    slots: HashMap<Uuid, AppointmentSlot>,
    appointments: HashMap<Uuid, Appointment>,
}

impl LocalStore {
    pub fn add_caregiver(&self, caregiver: Caregiver) {
        let mut tables = self.inner.lock().unwrap();
        tables.caregivers.insert(caregiver.id, caregiver);
    }

    pub fn add_slot(
        &self,
        caregiver_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let mut tables = self.inner.lock().unwrap();
        tables.slots.insert(
            id,
            AppointmentSlot {
                id,
                caregiver_id,
                date,
                start_time,
                end_time,
                is_available: true,
            },
        );
        id
    }

    /// Fills the store with a few caregivers and a week of half-hour
    /// slots each, so the server is browsable right after startup.
    pub fn insert_example_data(&self) {
        const NUMBER_OF_EXAMPLE_DAYS: i64 = 7;

        let examples = [
            ("Dr. Sarah Miller", "sarah@pawcare.example", vec!["dogs", "cats", "surgery"], 8),
            ("Dr. Tom Okafor", "tom@pawcare.example", vec!["birds", "reptiles", "exotic"], 12),
            ("Mia Lindgren", "mia@pawcare.example", vec!["dogs", "cats", "emergency"], 3),
        ];

        for (name, email, tags, years) in examples {
            let caregiver = Caregiver {
                id: Uuid::new_v4(),
                name: name.into(),
                email: email.into(),
                specialization: tags.into_iter().map(String::from).collect(),
                bio: None,
                experience_years: years,
                is_available: true,
            };
            let caregiver_id = caregiver.id;
            self.add_caregiver(caregiver);

            for day in 1..=NUMBER_OF_EXAMPLE_DAYS {
                let date = (Local::now() + Duration::days(day)).date_naive();
                for hour in [9, 11, 14] {
                    let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
                    let end = NaiveTime::from_hms_opt(hour, 30, 0).unwrap();
                    self.add_slot(caregiver_id, date, start, end);
                }
            }
        }
    }
}

impl BookingStore for LocalStore {
    fn caregivers(&self) -> Result<Vec<Caregiver>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut caregivers: Vec<Caregiver> = tables
            .caregivers
            .values()
            .filter(|caregiver| caregiver.is_available)
            .cloned()
            .collect();
        caregivers.sort_by(|a, b| b.experience_years.cmp(&a.experience_years));
        Ok(caregivers)
    }

    fn caregiver(&self, id: Uuid) -> Result<Option<Caregiver>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.caregivers.get(&id).cloned())
    }

    fn slot(&self, id: Uuid) -> Result<Option<AppointmentSlot>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.slots.get(&id).cloned())
    }

    fn available_slots(
        &self,
        caregiver_id: Uuid,
        from_date: NaiveDate,
    ) -> Result<Vec<AppointmentSlot>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut slots: Vec<AppointmentSlot> = tables
            .slots
            .values()
            .filter(|slot| {
                slot.caregiver_id == caregiver_id && slot.is_available && slot.date >= from_date
            })
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.date, slot.start_time));
        Ok(slots)
    }

    fn slots_for(&self, caregiver_id: Uuid) -> Result<Vec<AppointmentSlot>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut slots: Vec<AppointmentSlot> = tables
            .slots
            .values()
            .filter(|slot| slot.caregiver_id == caregiver_id)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.date, slot.start_time));
        Ok(slots)
    }

    fn claim_slot(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        match tables.slots.get_mut(&id) {
            Some(slot) if slot.is_available => {
                slot.is_available = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn release_slot(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if let Some(slot) = tables.slots.get_mut(&id) {
            slot.is_available = true;
        }
        Ok(())
    }

    fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        tables
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(())
    }

    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.appointments.get(&id).cloned())
    }

    fn appointments(&self, caregiver_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|appointment| appointment.caregiver_id == caregiver_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| {
            (appointment.appointment_date, appointment.appointment_time)
        });
        Ok(appointments)
    }

    fn update_status_if(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.inner.lock().unwrap();
        match tables.appointments.get_mut(&id) {
            Some(appointment) if appointment.status == expected => {
                appointment.status = new_status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
