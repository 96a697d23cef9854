use anyhow::Result;
use festival_core::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &EventStore) -> Result<()> {
    let countries = store.distinct_countries();
    if countries.is_empty() {
        println!("{}", "No countries found".dimmed());
    }
    for country in countries {
        println!("{}", country);
    }
    Ok(())
}
