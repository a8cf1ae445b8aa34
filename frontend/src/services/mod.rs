pub mod config;
pub mod logging;
pub mod supabase;

use shared::{AnimalGateway, SessionController, SupabaseConfig};

use self::supabase::SupabaseClient;

/// Gateway and session controller sharing one Supabase client
pub struct Services {
    pub gateway: AnimalGateway<SupabaseClient>,
    pub session: SessionController<SupabaseClient>,
}

impl Services {
    pub fn new(config: SupabaseConfig) -> Self {
        let client = SupabaseClient::new(config);
        Self {
            gateway: AnimalGateway::new(client.clone()),
            session: SessionController::new(client),
        }
    }
}
