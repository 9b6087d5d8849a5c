diesel::table! {
    caregivers (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        specialization -> Array<Text>,
        bio -> Nullable<Text>,
        experience_years -> Int4,
        is_available -> Bool,
    }
}

diesel::table! {
    appointment_slots (id) {
        id -> Uuid,
        caregiver_id -> Uuid,
        date -> Date,
        start_time -> Time,
        end_time -> Time,
        is_available -> Bool,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        caregiver_id -> Uuid,
        slot_id -> Uuid,
        client_name -> Text,
        client_email -> Text,
        client_phone -> Nullable<Text>,
        pet_type -> Text,
        pet_name -> Nullable<Text>,
        description -> Text,
        special_requirements -> Nullable<Text>,
        appointment_date -> Date,
        appointment_time -> Time,
        status -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(caregivers, appointment_slots, appointments);
