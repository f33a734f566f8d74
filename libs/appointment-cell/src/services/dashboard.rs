use std::collections::HashSet;

use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AdminDashboard, Appointment, AppointmentError, DoctorDashboard};
use crate::services::booking::BookingService;

const LATEST_APPOINTMENTS: usize = 5;

pub struct DashboardService {
    supabase: SupabaseClient,
    bookings: BookingService,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            bookings: BookingService::new(config),
        }
    }

    /// Collection counts plus the five most recent bookings.
    pub async fn admin_dashboard(
        &self,
        auth_token: &str,
    ) -> Result<AdminDashboard, AppointmentError> {
        let doctors = self
            .supabase
            .count("doctors", None, Some(auth_token))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        let patients = self
            .supabase
            .count("patients", None, Some(auth_token))
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let appointments = self.bookings.all_appointments(auth_token).await?;

        Ok(AdminDashboard {
            doctors,
            patients,
            appointments: appointments.len() as i64,
            latest_appointments: latest(appointments),
        })
    }

    /// A doctor's earnings, patient reach, and recent bookings. Earnings
    /// count appointments that were paid for or carried out.
    pub async fn doctor_dashboard(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<DoctorDashboard, AppointmentError> {
        let appointments = self
            .bookings
            .doctor_appointments(doctor_id, auth_token)
            .await?;

        let earnings = appointments
            .iter()
            .filter(|a| a.payment || a.is_completed)
            .map(|a| a.amount)
            .sum();

        let patients: HashSet<Uuid> = appointments.iter().map(|a| a.user_id).collect();

        Ok(DoctorDashboard {
            earnings,
            appointments: appointments.len() as i64,
            patients: patients.len() as i64,
            latest_appointments: latest(appointments),
        })
    }
}

fn latest(appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.into_iter().take(LATEST_APPOINTMENTS).collect()
}
