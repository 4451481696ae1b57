fn main() -> anyhow::Result<()> {
    env_logger::init();

    toroidal::run(toroidal::LifeConfig::default())?;
    Ok(())
}
