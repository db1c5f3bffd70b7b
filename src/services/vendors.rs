//! Vendor onboarding.
//!
//! Approval is four independent writes in a fixed order. A failed step is
//! logged and recorded, and the remaining steps still run. Running it again
//! re-applies the same field values and sends the notification again.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::email::templates;
use crate::error::AppError;
use crate::models::notification::NotificationKind;
use crate::models::profile::Role;
use crate::models::vendor::{ApplicationStatus, Vendor, VendorApplication, VendorStatus};
use crate::services::notification::NotificationRequest;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStep {
    ApplicationStatus,
    VendorRecord,
    UserRole,
    Notification,
}

impl ApprovalStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStep::ApplicationStatus => "application_status",
            ApprovalStep::VendorRecord => "vendor_record",
            ApprovalStep::UserRole => "user_role",
            ApprovalStep::Notification => "notification",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: ApprovalStep,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalReport {
    pub application_id: Uuid,
    pub steps: Vec<StepOutcome>,
}

impl ApprovalReport {
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|step| step.ok)
    }

    fn record(&mut self, state: &AppState, step: ApprovalStep, error: Option<String>) {
        let ok = error.is_none();
        if let Some(err) = &error {
            error!(
                application_id = %self.application_id,
                step = step.as_str(),
                error = %err,
                "vendor approval step failed; continuing"
            );
        }

        state
            .metrics
            .vendor_approval_steps_total
            .with_label_values(&[step.as_str(), if ok { "success" } else { "error" }])
            .inc();

        self.steps.push(StepOutcome { step, ok, error });
    }

    fn record_store(&mut self, state: &AppState, step: ApprovalStep, result: Result<(), StoreError>) {
        self.record(state, step, result.err().map(|err| err.to_string()));
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub business_name: String,
    pub business_email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

pub async fn submit_application(
    state: &AppState,
    new_application: NewApplication,
) -> Result<VendorApplication, AppError> {
    if new_application.business_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "business_name cannot be empty".to_string(),
        ));
    }

    if !new_application.business_email.contains('@') {
        return Err(AppError::BadRequest(
            "business_email must be an email address".to_string(),
        ));
    }

    let application = VendorApplication {
        id: Uuid::new_v4(),
        user_id: new_application.user_id,
        business_name: new_application.business_name.trim().to_string(),
        business_email: new_application.business_email.trim().to_string(),
        phone: new_application.phone,
        description: new_application.description,
        status: ApplicationStatus::Pending,
        rejection_reason: None,
        created_at: Utc::now(),
        reviewed_at: None,
    };

    state
        .store
        .insert_vendor_application(application.clone())
        .await?;
    info!(application_id = %application.id, user_id = %application.user_id, "vendor application submitted");

    Ok(application)
}

pub async fn list_applications(
    state: &AppState,
    status: Option<ApplicationStatus>,
) -> Result<Vec<VendorApplication>, AppError> {
    let mut applications: Vec<VendorApplication> = state
        .store
        .list_vendor_applications()
        .await?
        .into_iter()
        .filter(|application| status.is_none_or(|status| application.status == status))
        .collect();
    applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(applications)
}

pub async fn get_application(state: &AppState, id: Uuid) -> Result<VendorApplication, AppError> {
    state
        .store
        .get_vendor_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vendor application {} not found", id)))
}

pub async fn list_vendors(state: &AppState) -> Result<Vec<Vendor>, AppError> {
    let mut vendors = state.store.list_vendors().await?;
    vendors.sort_by(|a, b| a.business_name.cmp(&b.business_name));
    Ok(vendors)
}

pub async fn approve_application(state: &AppState, id: Uuid) -> Result<ApprovalReport, AppError> {
    let application = get_application(state, id).await?;
    let mut report = ApprovalReport {
        application_id: id,
        steps: Vec::with_capacity(4),
    };

    let result = state
        .store
        .update_vendor_application_status(id, ApplicationStatus::Approved, None)
        .await;
    report.record_store(state, ApprovalStep::ApplicationStatus, result);

    let vendor = Vendor {
        user_id: application.user_id,
        business_name: application.business_name.clone(),
        business_email: application.business_email.clone(),
        status: VendorStatus::Approved,
        updated_at: Utc::now(),
    };
    let result = state.store.upsert_vendor(vendor).await;
    report.record_store(state, ApprovalStep::VendorRecord, result);

    let result = state
        .store
        .set_user_role(application.user_id, Role::Vendor)
        .await;
    report.record_store(state, ApprovalStep::UserRole, result);

    let outcome = state
        .notifier
        .send(NotificationRequest::from_notice(
            application.user_id,
            templates::vendor_approved(&application.business_name),
            NotificationKind::Vendor,
            Some(application.business_email.clone()),
        ))
        .await;
    let delivered = outcome.db || outcome.email;
    report.record(
        state,
        ApprovalStep::Notification,
        if delivered {
            None
        } else {
            Some(outcome.error.unwrap_or_else(|| "not delivered".to_string()))
        },
    );

    info!(
        application_id = %id,
        complete = report.is_complete(),
        "vendor application approval finished"
    );

    Ok(report)
}

pub async fn reject_application(
    state: &AppState,
    id: Uuid,
    reason: &str,
) -> Result<VendorApplication, AppError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("rejection reason is required".to_string()));
    }

    let mut application = get_application(state, id).await?;
    state
        .store
        .update_vendor_application_status(id, ApplicationStatus::Rejected, Some(reason.to_string()))
        .await?;

    application.status = ApplicationStatus::Rejected;
    application.rejection_reason = Some(reason.to_string());
    application.reviewed_at = Some(Utc::now());
    info!(application_id = %id, "vendor application rejected");

    state.notifier.spawn(NotificationRequest::from_notice(
        application.user_id,
        templates::vendor_rejected(&application.business_name, reason),
        NotificationKind::Vendor,
        Some(application.business_email.clone()),
    ));

    Ok(application)
}
