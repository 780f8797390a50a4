use serde::Deserialize;

use crate::controller::FormController;
use crate::store::StoreGateway;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub form: FormController,
}

impl AppState {
    pub fn new(store: Box<dyn StoreGateway>) -> Self {
        Self {
            form: FormController::new(store),
        }
    }
}
