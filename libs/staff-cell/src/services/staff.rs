use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::records::sequential_ref;
use shared_utils::images::{content_type_for, decode_data_url};
use shared_utils::validation::is_valid_email;

use crate::models::{
    AddStaffRequest, StaffCategory, StaffError, StaffMember, UpdateStaffRequest, STAFF_COLUMNS,
};

pub struct StaffService {
    supabase: SupabaseClient,
}

impl StaffService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Hire a staff member. The reference is sequential within the
    /// category, derived from that category's row count.
    pub async fn add_staff(
        &self,
        request: AddStaffRequest,
        auth_token: &str,
    ) -> Result<StaffMember, StaffError> {
        if !is_valid_email(&request.email) {
            return Err(StaffError::Validation("Invalid email address".to_string()));
        }
        if request.salary < 0.0 {
            return Err(StaffError::Validation(
                "Salary cannot be negative".to_string(),
            ));
        }

        if self.email_exists(&request.email, auth_token).await? {
            return Err(StaffError::DuplicateEmail);
        }

        let count = self
            .supabase
            .count(
                "staff",
                Some(&format!("category=eq.{}", request.category)),
                Some(auth_token),
            )
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;
        let staff_ref = sequential_ref(request.category.ref_prefix(), count);

        let staff_id = Uuid::new_v4();

        let image_url = match &request.image {
            Some(data_url) => Some(self.upload_photo(staff_id, data_url, auth_token).await?),
            None => None,
        };

        let now = chrono::Utc::now().to_rfc3339();
        let row = json!({
            "id": staff_id,
            "staff_ref": staff_ref,
            "category": request.category,
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "image_url": image_url,
            "address": request.address,
            "department": request.department,
            "shift": request.shift,
            "salary": request.salary,
            "doctor_id": request.doctor_id,
            "joined_on": request.joined_on,
            "created_at": now,
            "updated_at": now,
        });

        let created = self
            .supabase
            .insert("staff", Some(auth_token), row)
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        let staff = created
            .first()
            .ok_or_else(|| StaffError::Database("Failed to create staff member".to_string()))
            .and_then(parse_staff)?;

        info!("Staff member {} hired as {}", staff.id, staff.staff_ref);
        Ok(staff)
    }

    /// Roster, newest hires first, optionally narrowed to one category.
    pub async fn list_staff(
        &self,
        category: Option<StaffCategory>,
        auth_token: &str,
    ) -> Result<Vec<StaffMember>, StaffError> {
        let mut path = format!(
            "/rest/v1/staff?select={}&order=created_at.desc",
            STAFF_COLUMNS
        );
        if let Some(category) = category {
            path.push_str(&format!("&category=eq.{}", category));
        }

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        rows.iter().map(parse_staff).collect()
    }

    pub async fn get_staff(
        &self,
        staff_id: Uuid,
        auth_token: &str,
    ) -> Result<StaffMember, StaffError> {
        let path = format!("/rest/v1/staff?id=eq.{}&select={}", staff_id, STAFF_COLUMNS);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        rows.first().ok_or(StaffError::NotFound).and_then(parse_staff)
    }

    /// Amend employment details. Category and reference are fixed at
    /// hiring time.
    pub async fn update_staff(
        &self,
        staff_id: Uuid,
        request: UpdateStaffRequest,
        auth_token: &str,
    ) -> Result<StaffMember, StaffError> {
        let mut update = serde_json::Map::new();
        if let Some(name) = request.name {
            update.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = request.phone {
            update.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update.insert("address".to_string(), json!(address));
        }
        if let Some(department) = request.department {
            update.insert("department".to_string(), json!(department));
        }
        if let Some(shift) = request.shift {
            update.insert("shift".to_string(), json!(shift));
        }
        if let Some(salary) = request.salary {
            if salary < 0.0 {
                return Err(StaffError::Validation(
                    "Salary cannot be negative".to_string(),
                ));
            }
            update.insert("salary".to_string(), json!(salary));
        }
        if let Some(doctor_id) = request.doctor_id {
            update.insert("doctor_id".to_string(), json!(doctor_id));
        }

        if update.is_empty() {
            return Err(StaffError::Validation("Nothing to update".to_string()));
        }
        update.insert(
            "updated_at".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        let filter = format!("id=eq.{}&select={}", staff_id, STAFF_COLUMNS);
        let updated = self
            .supabase
            .update("staff", &filter, Some(auth_token), Value::Object(update))
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        updated
            .first()
            .ok_or(StaffError::NotFound)
            .and_then(parse_staff)
    }

    /// Remove a staff member from the roster.
    pub async fn delete_staff(&self, staff_id: Uuid, auth_token: &str) -> Result<(), StaffError> {
        // DELETE with return=representation so an empty reply means the
        // row never existed.
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let deleted: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &format!("/rest/v1/staff?id=eq.{}", staff_id),
                Some(auth_token),
                None,
                Some(headers),
            )
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        if deleted.is_empty() {
            return Err(StaffError::NotFound);
        }

        info!("Staff member {} removed", staff_id);
        Ok(())
    }

    async fn email_exists(&self, email: &str, auth_token: &str) -> Result<bool, StaffError> {
        let path = format!(
            "/rest/v1/staff?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| StaffError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    async fn upload_photo(
        &self,
        staff_id: Uuid,
        data_url: &str,
        auth_token: &str,
    ) -> Result<String, StaffError> {
        let (bytes, ext) = decode_data_url(data_url).map_err(StaffError::Validation)?;

        let object_path = format!("staff/{}/{}.{}", staff_id, Uuid::new_v4(), ext);
        debug!("Uploading staff photo to {}", object_path);

        self.supabase
            .upload_object(
                "profiles",
                &object_path,
                bytes,
                &content_type_for(ext),
                auth_token,
            )
            .await
            .map_err(|e| StaffError::ExternalService(e.to_string()))
    }
}

fn parse_staff(row: &Value) -> Result<StaffMember, StaffError> {
    serde_json::from_value(row.clone())
        .map_err(|e| StaffError::Database(format!("Failed to parse staff member: {}", e)))
}
