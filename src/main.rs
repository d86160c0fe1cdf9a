use std::sync::Arc;

use eframe::egui;
use tarjetas::{
    config::{
        AppConfig,
        SESSION_FILE,
    },
    gui::TarjetasApp,
    remote::{
        RemoteDataService,
        SupabaseClient,
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let service: Arc<dyn RemoteDataService> = Arc::new(
        SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key)?
            .with_persisted_session(SESSION_FILE),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Español - Árabe")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tarjetas",
        options,
        Box::new(|cc| Ok(Box::new(TarjetasApp::new(cc, config, service)?))),
    )?;

    Ok(())
}
