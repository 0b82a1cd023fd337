fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_level(log::LevelFilter::Info)
        .with_local_timestamps()
        .init()?;

    let channels = seedlab_bridge::BridgeChannels::default();
    seedlab_backend::run(channels.backend_rx, channels.backend_tx);
    if let Err(e) = seedlab_frontend::run(channels.frontend_rx, channels.frontend_tx) {
        log::error!("Frontend stopped: {e:#}");
        return Err(e);
    }
    Ok(())
}
