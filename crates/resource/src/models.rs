//! Resource models for the DealerDash backend collections
//!
//! Each record carries a UUID identity, `created_at` and an optional
//! `updated_at`, serde-mapped to the backend's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dealerdash_session::Role;

use crate::validate::{FieldErrors, Validate};
use crate::view::Keyed;

/// ユーザー（管理画面のアカウント）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// ディーラー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 車両
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 顧客
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 注文ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// 注文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub dealer_id: Uuid,
    pub status: OrderStatus,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 予約ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Scheduled,
    Cancelled,
}

/// 試乗・来店予約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub dealer_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 在庫レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// プロモーション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_rate: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

macro_rules! keyed {
    ($($model:ty),* $(,)?) => {
        $(impl Keyed for $model {
            fn key(&self) -> Uuid {
                self.id
            }
        })*
    };
}

keyed!(User, Dealer, Vehicle, Customer, Order, Appointment, InventoryRecord, Promotion);

/// 車両の作成・更新ペイロード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub name: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: f64,
}

impl Validate for VehicleDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Vehicle name is required");
        }
        if self.model.trim().is_empty() {
            errors.insert("model", "Model is required");
        }
        if self.price <= 0.0 {
            errors.insert("price", "Price must be greater than zero");
        }
        errors.into_result()
    }
}

/// ユーザーの作成ペイロード
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.user_name.trim().is_empty() {
            errors.insert("userName", "User name is required");
        }
        if !self.email.contains('@') {
            errors.insert("email", "A valid email address is required");
        }
        if self.password.len() < 8 {
            errors.insert("password", "Password must be at least 8 characters");
        }
        if self.role.is_none() {
            errors.insert("role", "A role must be selected");
        }
        errors.into_result()
    }
}

/// 予約の作成ペイロード
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Validate for AppointmentDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.customer_id.is_none() {
            errors.insert("customerId", "A customer must be selected");
        }
        if self.vehicle_id.is_none() {
            errors.insert("vehicleId", "A vehicle must be selected");
        }
        match self.scheduled_at {
            None => errors.insert("scheduledAt", "A date and time is required"),
            Some(at) if at <= Utc::now() => {
                errors.insert("scheduledAt", "The appointment must be in the future")
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn vehicle_deserializes_from_camel_case() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": "7b1f8e8a-67a8-4c0f-9f9e-2b6f2f9f2a01",
            "name": "VF 8",
            "model": "Eco",
            "price": 40000.0,
            "imageUrl": "https://cdn.example.com/vf8.png",
            "createdAt": "2026-01-10T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(vehicle.name, "VF 8");
        assert_eq!(vehicle.image_url.as_deref(), Some("https://cdn.example.com/vf8.png"));
        assert!(vehicle.updated_at.is_none());
    }

    #[test]
    fn appointment_status_uses_plain_strings() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Scheduled).unwrap(),
            json!("Scheduled")
        );
        let status: AppointmentStatus = serde_json::from_value(json!("Cancelled")).unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn vehicle_draft_validation_reports_per_field() {
        let draft = VehicleDraft {
            name: " ".to_string(),
            model: "Eco".to_string(),
            price: 0.0,
            ..Default::default()
        };

        let errors = draft.validate().unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("model").is_none());
        assert!(errors.get("price").is_some());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn appointment_draft_requires_a_future_slot() {
        let draft = AppointmentDraft {
            customer_id: Some(Uuid::new_v4()),
            vehicle_id: Some(Uuid::new_v4()),
            scheduled_at: Some(Utc::now() - Duration::hours(1)),
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.get("scheduledAt").is_some());

        let draft = AppointmentDraft {
            scheduled_at: Some(Utc::now() + Duration::hours(1)),
            ..draft
        };
        assert!(draft.validate().is_ok());
    }
}
