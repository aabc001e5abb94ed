//! Issuer profile printed on generated documents.

use serde::Deserialize;

/// The service provider's identity, rendered into invoice and contract
/// headers and the provider party block.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    /// Name printed under the provider signature line.
    #[serde(default = "default_signatory")]
    pub signatory: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: default_name(),
            address: default_address(),
            email: default_email(),
            phone: default_phone(),
            signatory: default_signatory(),
        }
    }
}

fn default_name() -> String {
    "Everflow Home Services Pvt. Ltd.".to_string()
}

fn default_address() -> String {
    "4th Floor, Trade Centre, 100 Feet Road, Indiranagar, Bengaluru 560038".to_string()
}

fn default_email() -> String {
    "billing@everflowservices.in".to_string()
}

fn default_phone() -> String {
    "+91 80 4711 2200".to_string()
}

fn default_signatory() -> String {
    "Authorised Signatory".to_string()
}
