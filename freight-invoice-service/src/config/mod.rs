use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Service configuration: HTTP port plus the fixed identity blocks printed on
/// every invoice (company header, boilerplate terms, branding).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub port: u16,
    pub company: CompanyConfig,
    pub branding: BrandingConfig,
    pub terms: Vec<String>,
}

/// Company identity block rendered on the top right of the invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    pub registration_id: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city_line: String,
    pub country: String,
    pub gstin: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Path to a JPEG/PNG logo. Invoices render without the logo when the
    /// file is absent or undecodable.
    pub logo_path: Option<String>,
    pub footer_note: String,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            port: 8080,
            company: CompanyConfig::default(),
            branding: BrandingConfig::default(),
            terms: default_terms(),
        }
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        CompanyConfig {
            name: "MERIDIAN EXPRESS LOGISTICS PRIVATE LIMITED".to_string(),
            registration_id: "Company ID: U63040KA2023PTC171208".to_string(),
            address_line1: "NO. 42, 3RD CROSS, KODIGEHALLI MAIN ROAD".to_string(),
            address_line2: "SAHAKAR NAGAR POST".to_string(),
            city_line: "BENGALURU, Karnataka 560092".to_string(),
            country: "India".to_string(),
            gstin: "29AAKCM4121R1ZD".to_string(),
            phone: "+91 9845012345".to_string(),
            email: "billing@meridianexpress.in".to_string(),
            website: "www.meridianexpress.in".to_string(),
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        BrandingConfig {
            logo_path: None,
            footer_note: "Powered by: Meridian Express".to_string(),
        }
    }
}

fn default_terms() -> Vec<String> {
    vec![
        "1. Any discrepancy in this invoice must be reported in writing within 7 days from the date of receipt.".to_string(),
        "2. Interest at 18% per annum will be charged on amounts outstanding after the due date.".to_string(),
        "3. Bank details for payment through NEFT or RTGS are as mentioned below:".to_string(),
        "   Beneficiary Name : MERIDIAN EXPRESS LOGISTICS PRIVATE LIMITED".to_string(),
        "   Bank Name : FEDERAL COMMERCE BANK".to_string(),
        "   Account Number : 002447100023156".to_string(),
        "   IFSC Code : FCBL0000244".to_string(),
        "4. This is a computer generated document and does not require a signature.".to_string(),
    ]
}
