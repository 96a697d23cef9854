use anyhow::Result;
use chrono_tz::Tz;

use super::{FilterArgs, now_in};

/// Print the query string that reproduces the selection.
pub fn run(filters: FilterArgs, tz: Tz) -> Result<()> {
    let query = filters.criteria(&now_in(tz)).to_query_string();
    if query.is_empty() {
        println!("?");
    } else {
        println!("?{}", query);
    }
    Ok(())
}
