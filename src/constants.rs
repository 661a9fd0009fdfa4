// Upstream API
pub const DEFAULT_BASE_URL: &str = "https://api.ofd-ya.ru";
// Relative to the base URL, so a gateway prefix such as `/ofd/` is kept
pub const REGISTERS_PATH: &str = "ofdapi/v2/KKT";
pub const DOCUMENTS_PATH: &str = "ofdapi/v1/documents";
pub const CHEQUE_LINK_PATH: &str = "ofdapi/v1/getChequeLink";

// Authentication
pub const TOKEN_HEADER: &str = "Ofdapitoken";
pub const TOKEN_ENV_VAR: &str = "OFD_YA_TOKEN";

// Request date layout, e.g. 2024-03-01
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const USER_AGENT: &str = concat!("ofd-ya/", env!("CARGO_PKG_VERSION"));
