mod command;
mod logging;
mod source;
mod util;

fn main() -> anyhow::Result<()> {
    logging::init();
    command::run()
}
