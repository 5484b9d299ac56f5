//! Domain types shared across the console.
//!
//! Field names follow the platform's wire format (camelCase JSON). Most
//! fields carry `#[serde(default)]` so partially-populated records from
//! the backend still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Organizations ─────────────────────────────────────────────────────

/// An organization as returned by GET /organizations.
///
/// `name` is set for business organizations; individuals carry
/// `first_name`/`last_name` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(rename = "type", default)]
    pub org_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tos_status: String,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub currency_capabilities: Vec<CurrencyCapability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatus {
    /// e.g. "approved", "pending", "INACTIVE".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub kyc_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyCapability {
    pub currency_code: String,
    #[serde(default)]
    pub fiat_and_rail_code: String,
    #[serde(default)]
    pub deposit_status: CapabilityStatus,
    #[serde(default)]
    pub pay_out_status: CapabilityStatus,
}

/// "enabled" / "disabled" with an optional reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatus {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Body for POST /organizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    /// "individual" or "business".
    #[serde(rename = "type")]
    pub org_type: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

// ── Accounts ──────────────────────────────────────────────────────────

/// An account as returned by GET /accounts/{org_id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_api_enabled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub account_details: AccountDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub deposit_account: Option<DepositAccount>,
    #[serde(default)]
    pub wallet_details: Option<WalletDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub token_amount: f64,
    pub token_symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAccount {
    pub id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub bank_account_number: String,
    #[serde(default)]
    pub bank_routing_number: String,
    #[serde(default)]
    pub bank_address: String,
    #[serde(default)]
    pub bank_beneficiary_name: String,
    #[serde(default)]
    pub bank_beneficiary_address: String,
    #[serde(default)]
    pub payment_rails: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDetails {
    #[serde(default)]
    pub blockchain: String,
    #[serde(default)]
    pub wallet_address: String,
}

/// Body for POST /accounts/{org_id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Payouts ───────────────────────────────────────────────────────────

/// A payout batch as returned by the payout search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub source_account_id: String,
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payouts: Vec<SinglePayout>,
}

/// One line item inside a payout batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePayout {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub amount: TokenAmount,
    #[serde(default)]
    pub details: Option<PayoutDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub token_amount: f64,
    pub token_symbol: String,
}

/// Settlement-side details of an executed (or executing) line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDetails {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub exchange_fee_percentage: f64,
    #[serde(default)]
    pub exchange_rate: f64,
    #[serde(default)]
    pub fee_total: Option<TokenAmount>,
    #[serde(default)]
    pub transaction_fee: Option<TokenAmount>,
    #[serde(default)]
    pub fiat_amount: Option<FiatAmount>,
    #[serde(default)]
    pub fiat_and_rail_code: String,
    #[serde(default)]
    pub fiat_payout_status: Option<FiatPayoutStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiatAmount {
    pub fiat_amount: f64,
    pub fiat_currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiatPayoutStatus {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub initiated_at: Option<DateTime<Utc>>,
}

/// Body for POST /payouts/create/{org_id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub source_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub payouts: Vec<PayoutItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutItem {
    pub amount: TokenAmount,
    pub payout_details: RecipientPayoutDetails,
    pub recipient_info: RecipientInfo,
}

/// Recipient-side rail details of a requested line item. Distinct from
/// [`PayoutDetails`], which is the settlement-side shape the backend
/// returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientPayoutDetails {
    /// e.g. "fiat".
    #[serde(rename = "type")]
    pub kind: String,
    pub bank_name: String,
    pub bank_account_owner: String,
    pub fiat_and_rail_details: FiatAndRailDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiatAndRailDetails {
    /// e.g. "cop".
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    pub account_type: String,
    #[serde(default)]
    pub phone_number: String,
    pub bank_account_number: String,
    #[serde(default)]
    pub document_number: String,
    /// e.g. "NATIONAL_ID".
    #[serde(default)]
    pub document_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientInfo {
    /// e.g. "individual".
    #[serde(rename = "type")]
    pub kind: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// "YYYY-MM-DD".
    pub date_of_birth: String,
    pub physical_address: PhysicalAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalAddress {
    pub address1: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub zip: String,
}

/// Body for the payout search endpoint. The default filter matches every
/// payout status the backend knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSearchRequest {
    pub filter: PayoutSearchFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSearchFilter {
    #[serde(rename = "type")]
    pub kind: String,
    pub statuses: Vec<String>,
}

impl Default for PayoutSearchRequest {
    fn default() -> Self {
        Self {
            filter: PayoutSearchFilter {
                kind: "payoutStatus".to_string(),
                statuses: [
                    "AWAITING_EXECUTION",
                    "PENDING",
                    "EXECUTED",
                    "FAILED",
                    "CANCELED",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
        }
    }
}
