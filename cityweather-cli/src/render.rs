use std::fmt::Write;

use cityweather_core::WeatherDisplay;

/// Plain-text rendering of the weather home view.
pub fn weather(display: &WeatherDisplay) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", display.location);
    let _ = writeln!(out, "{}  {}", display.temperature, display.description);
    let _ = writeln!(out, "{}", display.min_max);
    let _ = writeln!(
        out,
        "Precipitation {}  Humidity {}  Wind {}  Visibility {} km",
        display.precipitation, display.humidity, display.wind_speed, display.visibility
    );

    if !display.hourly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Today  {} {}", display.date, display.time);
        for (time, temp) in &display.hourly {
            let _ = writeln!(out, "  {time}  {temp}");
        }
    }

    out
}
