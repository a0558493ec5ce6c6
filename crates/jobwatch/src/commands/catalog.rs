use clap::ArgMatches;

use jobwatch_core::catalog::{self, CatalogOption};
use jobwatch_core::events;

use super::helpers::{build_client, load_config, print_json, runtime};

pub(crate) fn handle_models_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let brand_id = matches
        .get_one::<String>("brand-id")
        .ok_or("Brand id argument is required")?;

    let config = load_config(matches);
    let client = build_client(&config)?;

    let options = match runtime()?.block_on(catalog::fetch_models(&client, brand_id)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("❌ {}", e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    print_options(&options, matches.get_flag("json"))
}

pub(crate) fn handle_car_types_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let model_id = matches
        .get_one::<String>("model-id")
        .ok_or("Model id argument is required")?;

    let config = load_config(matches);
    let client = build_client(&config)?;

    let options = runtime()?.block_on(catalog::fetch_car_types(&client, model_id));
    print_options(&options, matches.get_flag("json"))
}

fn print_options(options: &[CatalogOption], json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        return print_json(&options);
    }

    for option in options {
        if option.value.is_empty() {
            println!("   {}", option.label);
        } else {
            println!("{:>10}  {}", option.value, option.label);
        }
    }
    Ok(())
}
