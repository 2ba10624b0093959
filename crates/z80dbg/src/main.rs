fn main() {
    let config = match z80dbg::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut logger = env_logger::Builder::from_default_env();
    if config.trace {
        logger.filter_module("z80dbg_core", log::LevelFilter::Trace);
    }
    logger.init();

    if let Err(err) = z80dbg::run(&config) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
