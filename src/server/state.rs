use crate::checkout::CheckoutIntegration;
use crate::location::LocationQuery;

pub struct AppState {
    pub checkout: CheckoutIntegration,
    /// Used when a quote request names no origin.
    pub default_origin: Option<LocationQuery>,
}
