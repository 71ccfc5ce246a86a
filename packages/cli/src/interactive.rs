//! Interactive dashboard.
//!
//! Shows the navigation menu for the current session and opens the chosen
//! page until the user quits. Signed-out users only see the auth pages.

use dialoguer::{Confirm, Input, Password, Select};
use road_safety_accident_models::{
    DriverAge, JunctionControl, LightCondition, RoadSurface, RoadType, SPEED_LIMIT_OPTIONS,
    TimeOfDay, VehicleType, WeatherCondition,
};
use road_safety_api_models::PredictionInput;
use road_safety_server::DEFAULT_HOTSPOT_LIMIT;
use road_safety_session::Route;
use road_safety_session_models::{ProfileUpdate, SignupForm};

use crate::dashboard::{CliError, Dashboard};
use crate::render;

enum Action {
    Open(Route),
    Logout,
    Quit,
}

impl Action {
    const fn label(&self) -> &'static str {
        match self {
            Self::Open(route) => route.label(),
            Self::Logout => "Log out",
            Self::Quit => "Quit",
        }
    }
}

fn menu(dash: &Dashboard) -> Vec<Action> {
    let mut actions: Vec<Action> = if dash.session().is_some() {
        dash.navigation().into_iter().map(Action::Open).collect()
    } else {
        vec![Action::Open(Route::Login), Action::Open(Route::Signup)]
    };
    if dash.session().is_some() {
        actions.push(Action::Logout);
    }
    actions.push(Action::Quit);
    actions
}

/// Runs the menu loop until the user picks "Quit".
///
/// # Errors
///
/// Returns [`CliError::Prompt`] if the terminal cannot be read, or
/// [`CliError::Session`] if logging out fails. Page errors are printed and
/// the menu is shown again.
pub async fn run(dash: &mut Dashboard) -> Result<(), CliError> {
    println!("Road Safety Dashboard");
    println!();

    loop {
        let actions = menu(dash);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();

        let idx = Select::new()
            .with_prompt("Where to?")
            .items(&labels)
            .default(0)
            .interact()?;

        let outcome = match &actions[idx] {
            Action::Open(route) => open(dash, *route).await,
            Action::Logout => {
                dash.logout()?;
                println!("Logged out.");
                Ok(())
            }
            Action::Quit => return Ok(()),
        };

        match outcome {
            Err(e @ CliError::Prompt(_)) => return Err(e),
            Err(e) => eprintln!("{e}"),
            Ok(()) => {}
        }
        println!();
    }
}

async fn open(dash: &mut Dashboard, route: Route) -> Result<(), CliError> {
    dash.open(route)?;

    match route {
        Route::Home => {
            println!("{}", render::stats(&dash.stats().await?));
            println!("\n{}", render::monthly_trend(&dash.monthly_trend().await?));
        }
        Route::Predict => {
            let input = prediction_form()?;
            match dash.predict(&input).await? {
                Some(result) => println!("{}", render::prediction(result)),
                None => println!("A prediction is already running."),
            }
            println!("\nRecent predictions:\n{}", render::history(dash.history()));
        }
        Route::Analysis => {
            let limit: u32 = Input::new()
                .with_prompt("How many records?")
                .default(DEFAULT_HOTSPOT_LIMIT)
                .interact_text()?;
            let (records, clusters) = dash.hotspots(limit).await?;
            println!("{}", render::hotspots(&records, &clusters));
        }
        Route::Profile => {
            if let Some(session) = dash.session() {
                println!("{}", render::session(session));
            }
            if Confirm::new()
                .with_prompt("Edit profile?")
                .default(false)
                .interact()?
            {
                let update = profile_form()?;
                let session = dash.update_profile(update)?;
                println!("Saved: {}", render::session(session));
            }
        }
        Route::Admin => {
            println!("{}", render::admin(&dash.admin_stats().await?));
            println!("\n{}", render::admin_users(&dash.admin_users().await?));
        }
        Route::Login => {
            let email: String = Input::new().with_prompt("Email").interact_text()?;
            let password = Password::new().with_prompt("Password").interact()?;
            let session = dash.login(&email, &password).await?;
            println!("Welcome, {}!", session.name);
        }
        Route::Signup => {
            let form = signup_form()?;
            let session = dash.signup(form).await?;
            println!("Welcome, {}!", session.name);
        }
    }

    Ok(())
}

fn choose<T: Copy + PartialEq + ToString>(
    prompt: &str,
    options: &[T],
    default: T,
) -> Result<T, CliError> {
    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(options.iter().position(|o| *o == default).unwrap_or(0))
        .interact()?;
    Ok(options[idx])
}

fn prediction_form() -> Result<PredictionInput, CliError> {
    let defaults = PredictionInput::default();

    Ok(PredictionInput {
        weather_conditions: choose(
            "Weather",
            WeatherCondition::all(),
            defaults.weather_conditions,
        )?,
        light_conditions: choose("Light", LightCondition::all(), defaults.light_conditions)?,
        road_type: choose("Road type", RoadType::all(), defaults.road_type)?,
        speed_limit: choose("Speed limit", SPEED_LIMIT_OPTIONS, defaults.speed_limit)?,
        vehicle_type: choose("Vehicle", VehicleType::all(), defaults.vehicle_type)?,
        junction_control: choose(
            "Junction control",
            JunctionControl::all(),
            defaults.junction_control,
        )?,
        road_surface: choose("Road surface", RoadSurface::all(), defaults.road_surface)?,
        pedestrian_involved: Confirm::new()
            .with_prompt("Pedestrian involved?")
            .default(false)
            .interact()?,
        alcohol_involved: Confirm::new()
            .with_prompt("Alcohol involved?")
            .default(false)
            .interact()?,
        driver_age: choose("Driver age", DriverAge::all(), defaults.driver_age)?,
        time_of_day: choose("Time of day", TimeOfDay::all(), defaults.time_of_day)?,
    })
}

fn signup_form() -> Result<SignupForm, CliError> {
    Ok(SignupForm {
        name: Input::new().with_prompt("Full name").interact_text()?,
        email: Input::new().with_prompt("Email").interact_text()?,
        password: Password::new().with_prompt("Password").interact()?,
        confirm_password: Password::new().with_prompt("Confirm password").interact()?,
        agree_terms: Confirm::new()
            .with_prompt("Do you agree to the terms and conditions?")
            .default(false)
            .interact()?,
    })
}

fn profile_form() -> Result<ProfileUpdate, CliError> {
    let name: String = Input::new()
        .with_prompt("New name (blank to keep)")
        .allow_empty(true)
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("New email (blank to keep)")
        .allow_empty(true)
        .interact_text()?;

    let contact = |label: &str| -> Result<Option<String>, CliError> {
        let value: String = Input::new()
            .with_prompt(format!("{label} (blank to keep, - to remove)"))
            .allow_empty(true)
            .interact_text()?;
        Ok(contact_edit(value))
    };

    let non_blank = |value: String| Some(value).filter(|v| !v.trim().is_empty());
    Ok(ProfileUpdate {
        name: non_blank(name),
        email: non_blank(email),
        phone: contact("Phone")?,
        address: contact("Address")?,
        city: contact("City")?,
        country: contact("Country")?,
    })
}

/// Blank keeps the stored value and `-` clears it.
fn contact_edit(value: String) -> Option<String> {
    match value.trim() {
        "" => None,
        "-" => Some(String::new()),
        _ => Some(value),
    }
}
