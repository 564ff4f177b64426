use serde::{Deserialize, Serialize};

/// Store contact details quoted by the assistant and used for WhatsApp links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreContact {
    /// International number without `+` or spaces, as wa.me expects it
    pub whatsapp_number: String,
    /// Human readable phone number
    pub phone: String,
    pub address: String,
}

impl Default for StoreContact {
    fn default() -> Self {
        Self {
            whatsapp_number: "917976948872".to_string(),
            phone: "+91 79769 48872".to_string(),
            address: "Sewa Sadan Rd, near Sitaram Ji Ki Bawri, Bhopal Ganj, Bhilwara, Rajasthan 311001"
                .to_string(),
        }
    }
}
