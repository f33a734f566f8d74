use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use doctor_cell::services::doctor::DoctorService;
use doctor_cell::services::slots::SlotService;
use patient_cell::services::patient::PatientService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::validation::is_valid_slot_date;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, APPOINTMENT_COLUMNS,
};

pub struct BookingService {
    supabase: SupabaseClient,
    doctors: DoctorService,
    patients: PatientService,
    slots: SlotService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            doctors: DoctorService::new(config),
            patients: PatientService::new(config),
            slots: SlotService::new(config),
        }
    }

    /// Book a slot with a doctor. Reserves the time in the doctor's
    /// `slots_booked` map first, then inserts the appointment row carrying
    /// snapshots of both parties; if the insert fails the reservation is
    /// rolled back on a best-effort basis.
    pub async fn book(
        &self,
        user_id: Uuid,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        if !is_valid_slot_date(&request.slot_date) {
            return Err(AppointmentError::Validation(format!(
                "Invalid slot date: {}",
                request.slot_date
            )));
        }
        if request.slot_time.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Slot time is required".to_string(),
            ));
        }

        let doctor = self.doctors.get_doctor(request.doctor_id, Some(auth_token)).await?;
        let patient = self.patients.get_profile(user_id, auth_token).await?;

        self.slots
            .reserve_slot(
                request.doctor_id,
                &request.slot_date,
                &request.slot_time,
                Some(auth_token),
            )
            .await?;

        let row = json!({
            "id": Uuid::new_v4(),
            "user_id": user_id,
            "doctor_id": doctor.id,
            "slot_date": request.slot_date.clone(),
            "slot_time": request.slot_time.clone(),
            "user_data": patient.snapshot(),
            "doc_data": doctor.snapshot(),
            "amount": doctor.fee,
            "booked_at": chrono::Utc::now().to_rfc3339(),
            "cancelled": false,
            "is_completed": false,
            "payment": false,
        });

        let created = match self.supabase.insert("appointments", Some(auth_token), row).await {
            Ok(rows) => rows,
            Err(e) => {
                // The slot was reserved but the appointment never landed.
                if let Err(release_err) = self
                    .slots
                    .release_slot(
                        request.doctor_id,
                        &request.slot_date,
                        &request.slot_time,
                        Some(auth_token),
                    )
                    .await
                {
                    warn!(
                        "Failed to release slot after aborted booking: {}",
                        release_err
                    );
                }
                return Err(AppointmentError::Database(e.to_string()));
            }
        };

        let appointment = created
            .first()
            .ok_or_else(|| AppointmentError::Database("Failed to create appointment".to_string()))
            .and_then(parse_appointment)?;

        info!(
            "Appointment {} booked: patient {} with doctor {} at {} {}",
            appointment.id, user_id, doctor.id, appointment.slot_date, appointment.slot_time
        );
        Ok(appointment)
    }

    /// A patient's own appointments, most recently booked first.
    pub async fn user_appointments(
        &self,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.list(&format!("user_id=eq.{}", user_id), Some(auth_token)).await
    }

    /// A doctor's schedule, most recently booked first.
    pub async fn doctor_appointments(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.list(&format!("doctor_id=eq.{}", doctor_id), Some(auth_token)).await
    }

    pub async fn all_appointments(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.list("", Some(auth_token)).await
    }

    /// Patient-initiated cancellation. Only the booking patient may
    /// cancel, and only once; the slot goes back into the pool.
    pub async fn cancel(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(appointment_id, auth_token).await?;
        if appointment.user_id != user_id {
            return Err(AppointmentError::NotOwned);
        }

        self.cancel_and_release(appointment, auth_token).await
    }

    /// Admin cancellation: any appointment, no ownership check.
    pub async fn admin_cancel(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(appointment_id, auth_token).await?;
        self.cancel_and_release(appointment, auth_token).await
    }

    /// Doctor-initiated cancellation of an appointment on their own
    /// schedule.
    pub async fn doctor_cancel(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(appointment_id, auth_token).await?;
        if appointment.doctor_id != doctor_id {
            return Err(AppointmentError::NotOwned);
        }

        self.cancel_and_release(appointment, auth_token).await
    }

    /// Mark an appointment on the doctor's own schedule as completed.
    pub async fn complete(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(appointment_id, auth_token).await?;
        if appointment.doctor_id != doctor_id {
            return Err(AppointmentError::NotOwned);
        }
        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        let updated = self
            .patch(appointment_id, json!({ "is_completed": true }), auth_token)
            .await?;

        info!("Appointment {} marked completed by doctor {}", appointment_id, doctor_id);
        Ok(updated)
    }

    async fn cancel_and_release(
        &self,
        appointment: Appointment,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        if appointment.cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }

        let updated = self
            .patch(appointment.id, json!({ "cancelled": true }), auth_token)
            .await?;

        // Release after the row is flagged, so a failed release can at
        // worst leave a phantom reservation, never a double booking.
        if let Err(e) = self
            .slots
            .release_slot(
                appointment.doctor_id,
                &appointment.slot_date,
                &appointment.slot_time,
                Some(auth_token),
            )
            .await
        {
            warn!(
                "Appointment {} cancelled but slot release failed: {}",
                appointment.id, e
            );
        }

        info!("Appointment {} cancelled", appointment.id);
        Ok(updated)
    }

    pub(crate) async fn get(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, APPOINTMENT_COLUMNS
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        rows.first()
            .ok_or(AppointmentError::NotFound)
            .and_then(parse_appointment)
    }

    pub(crate) async fn list(
        &self,
        filter: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut path = format!(
            "/rest/v1/appointments?select={}&order=booked_at.desc",
            APPOINTMENT_COLUMNS
        );
        if !filter.is_empty() {
            path.push('&');
            path.push_str(filter);
        }

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        rows.iter().map(parse_appointment).collect()
    }

    async fn patch(
        &self,
        appointment_id: Uuid,
        body: Value,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let filter = format!("id=eq.{}&select={}", appointment_id, APPOINTMENT_COLUMNS);
        let updated = self
            .supabase
            .update("appointments", &filter, Some(auth_token), body)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        updated
            .first()
            .ok_or(AppointmentError::NotFound)
            .and_then(parse_appointment)
    }
}

fn parse_appointment(row: &Value) -> Result<Appointment, AppointmentError> {
    serde_json::from_value(row.clone())
        .map_err(|e| AppointmentError::Database(format!("Failed to parse appointment: {}", e)))
}
