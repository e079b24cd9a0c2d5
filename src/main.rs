use urlshort::{err, opt, serve};

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let options: opt::Options = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match options.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    serve::main(options).await?;

    Ok(())
}
