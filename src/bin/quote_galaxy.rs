use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    quote_galaxy::apps::run_quote_cli(std::env::args().skip(1))
}
