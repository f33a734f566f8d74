use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::DoctorError;

/// Reserve/release times in a doctor's `slots_booked` map. These are
/// plain read-modify-write document updates: the presence check below is
/// the only double-booking guard the system defines (no locking).
pub struct SlotService {
    supabase: SupabaseClient,
}

type SlotsBooked = HashMap<String, Vec<String>>;

/// Append `slot_time` under `slot_date`. Returns false when the time is
/// already present for that date.
pub fn reserve_in_map(slots: &mut SlotsBooked, slot_date: &str, slot_time: &str) -> bool {
    let times = slots.entry(slot_date.to_string()).or_default();
    if times.iter().any(|t| t == slot_time) {
        return false;
    }
    times.push(slot_time.to_string());
    true
}

/// Remove `slot_time` from `slot_date`'s list. A missing date or time is
/// not an error; an emptied list drops the date key.
pub fn release_in_map(slots: &mut SlotsBooked, slot_date: &str, slot_time: &str) {
    if let Some(times) = slots.get_mut(slot_date) {
        times.retain(|t| t != slot_time);
        if times.is_empty() {
            slots.remove(slot_date);
        }
    }
}

impl SlotService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Reserve a slot for an available doctor. Refuses when the doctor is
    /// unavailable or the time string is already present for that date.
    pub async fn reserve_slot(
        &self,
        doctor_id: Uuid,
        slot_date: &str,
        slot_time: &str,
        auth_token: Option<&str>,
    ) -> Result<(), DoctorError> {
        debug!("Reserving slot {} {} for doctor {}", slot_date, slot_time, doctor_id);

        let (available, mut slots) = self.fetch_slots(doctor_id, auth_token).await?;

        if !available {
            return Err(DoctorError::NotAvailable);
        }

        if !reserve_in_map(&mut slots, slot_date, slot_time) {
            return Err(DoctorError::SlotTaken {
                slot_date: slot_date.to_string(),
                slot_time: slot_time.to_string(),
            });
        }

        self.store_slots(doctor_id, &slots, auth_token).await?;

        info!("Slot {} {} reserved for doctor {}", slot_date, slot_time, doctor_id);
        Ok(())
    }

    /// Release a slot after cancellation. No check that the time was
    /// actually present; absence is tolerated.
    pub async fn release_slot(
        &self,
        doctor_id: Uuid,
        slot_date: &str,
        slot_time: &str,
        auth_token: Option<&str>,
    ) -> Result<(), DoctorError> {
        debug!("Releasing slot {} {} for doctor {}", slot_date, slot_time, doctor_id);

        let (_, mut slots) = self.fetch_slots(doctor_id, auth_token).await?;

        release_in_map(&mut slots, slot_date, slot_time);

        self.store_slots(doctor_id, &slots, auth_token).await?;

        info!("Slot {} {} released for doctor {}", slot_date, slot_time, doctor_id);
        Ok(())
    }

    async fn fetch_slots(
        &self,
        doctor_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<(bool, SlotsBooked), DoctorError> {
        let path = format!(
            "/rest/v1/doctors?id=eq.{}&select=id,available,slots_booked",
            doctor_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(DoctorError::NotFound);
        }

        let row = &result[0];
        let available = row["available"].as_bool().unwrap_or(false);
        let slots: SlotsBooked = serde_json::from_value(row["slots_booked"].clone())
            .unwrap_or_default();

        Ok((available, slots))
    }

    async fn store_slots(
        &self,
        doctor_id: Uuid,
        slots: &SlotsBooked,
        auth_token: Option<&str>,
    ) -> Result<(), DoctorError> {
        let filter = format!("id=eq.{}", doctor_id);
        let body = json!({
            "slots_booked": slots,
            "updated_at": chrono::Utc::now().to_rfc3339(),
        });

        let updated = self
            .supabase
            .update("doctors", &filter, auth_token, body)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if updated.is_empty() {
            return Err(DoctorError::Database(
                "Failed to update doctor slots".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserving_a_free_slot_appends() {
        let mut slots = SlotsBooked::new();
        assert!(reserve_in_map(&mut slots, "20_1_2026", "10:00 am"));
        assert!(reserve_in_map(&mut slots, "20_1_2026", "10:30 am"));
        assert_eq!(slots["20_1_2026"], vec!["10:00 am", "10:30 am"]);
    }

    #[test]
    fn reserving_a_taken_slot_is_refused() {
        let mut slots = SlotsBooked::new();
        assert!(reserve_in_map(&mut slots, "20_1_2026", "10:00 am"));
        assert!(!reserve_in_map(&mut slots, "20_1_2026", "10:00 am"));
        assert_eq!(slots["20_1_2026"].len(), 1);
    }

    #[test]
    fn same_time_on_other_dates_is_independent() {
        let mut slots = SlotsBooked::new();
        assert!(reserve_in_map(&mut slots, "20_1_2026", "10:00 am"));
        assert!(reserve_in_map(&mut slots, "21_1_2026", "10:00 am"));
    }

    #[test]
    fn releasing_removes_only_the_matching_time() {
        let mut slots = SlotsBooked::new();
        reserve_in_map(&mut slots, "20_1_2026", "10:00 am");
        reserve_in_map(&mut slots, "20_1_2026", "11:00 am");

        release_in_map(&mut slots, "20_1_2026", "10:00 am");
        assert_eq!(slots["20_1_2026"], vec!["11:00 am"]);
    }

    #[test]
    fn releasing_the_last_time_drops_the_date() {
        let mut slots = SlotsBooked::new();
        reserve_in_map(&mut slots, "20_1_2026", "10:00 am");

        release_in_map(&mut slots, "20_1_2026", "10:00 am");
        assert!(!slots.contains_key("20_1_2026"));
    }

    #[test]
    fn releasing_an_absent_slot_is_a_no_op() {
        let mut slots = SlotsBooked::new();
        release_in_map(&mut slots, "20_1_2026", "10:00 am");
        assert!(slots.is_empty());
    }
}
