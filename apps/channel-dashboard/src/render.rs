use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::chart::chart_payload;
use crate::error::FetchError;
use crate::pipeline::DashboardData;
use crate::series::Metric;
use crate::stats::format_stat;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
      body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #1f2933; }
      header { display: flex; justify-content: space-between; align-items: baseline; padding: 16px 24px; background: #1f2933; color: #fff; }
      header h1 { font-size: 20px; margin: 0; }
      main { padding: 24px; max-width: 1200px; margin: 0 auto; }
      .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 16px; }
      .card { background: #fff; border-radius: 8px; padding: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
      .card h2 { font-size: 14px; margin: 0 0 8px; color: #52606d; text-transform: uppercase; }
      .card .value { font-size: 28px; font-weight: 600; }
      .card dl { display: grid; grid-template-columns: auto 1fr; gap: 4px 12px; margin: 12px 0 0; font-size: 14px; }
      .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap: 16px; margin-top: 24px; }
      .updated { margin-top: 16px; color: #52606d; font-size: 14px; }
"#;

/// Values handed to the page. Statistics are 2-decimal numbers or `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardContext {
    pub viewer_name: String,
    pub channel_name: Option<String>,
    pub sample_count: usize,
    pub last_temperature: Option<f64>,
    pub last_humidity: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
    pub last_update: String,
    pub temperature_chart: JsonValue,
    pub humidity_chart: JsonValue,
}

impl DashboardContext {
    pub fn new(data: &DashboardData, viewer_name: &str) -> Self {
        let stats = &data.statistics;
        Self {
            viewer_name: viewer_name.to_string(),
            channel_name: data.channel_name.clone(),
            sample_count: data.sample_count,
            last_temperature: stats.temperature.last,
            last_humidity: stats.humidity.last,
            avg_temperature: stats.temperature.avg,
            min_temperature: stats.temperature.min,
            max_temperature: stats.temperature.max,
            avg_humidity: stats.humidity.avg,
            min_humidity: stats.humidity.min,
            max_humidity: stats.humidity.max,
            last_update: stats.last_update_label(),
            temperature_chart: chart_payload(&data.chart, Metric::Temperature),
            humidity_chart: chart_payload(&data.chart, Metric::Humidity),
        }
    }
}

pub fn dashboard_page(ctx: &DashboardContext) -> String {
    let title = ctx
        .channel_name
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "Telemetry Dashboard".to_string());

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <style>{STYLE}</style>
    <script src="{PLOTLY_CDN}"></script>
  </head>
  <body>
    <header>
      <h1>{title}</h1>
      <span>Signed in as {viewer}</span>
    </header>
    <main>
      <section class="cards">
        {temperature_card}
        {humidity_card}
      </section>
      <p class="updated">Last update: <strong>{last_update}</strong> &middot; {sample_count} samples</p>
      <section class="charts">
        <div class="card"><div id="temperature-chart"></div></div>
        <div class="card"><div id="humidity-chart"></div></div>
      </section>
    </main>
    <script>
      const temperatureChart = {temperature_chart};
      const humidityChart = {humidity_chart};
      Plotly.newPlot("temperature-chart", temperatureChart.data, temperatureChart.layout, {{ responsive: true }});
      Plotly.newPlot("humidity-chart", humidityChart.data, humidityChart.layout, {{ responsive: true }});
    </script>
  </body>
</html>
"#,
        viewer = escape_html(&ctx.viewer_name),
        temperature_card = stat_card(
            "Temperature",
            "°C",
            ctx.last_temperature,
            ctx.avg_temperature,
            ctx.min_temperature,
            ctx.max_temperature,
        ),
        humidity_card = stat_card(
            "Humidity",
            "%",
            ctx.last_humidity,
            ctx.avg_humidity,
            ctx.min_humidity,
            ctx.max_humidity,
        ),
        last_update = escape_html(&ctx.last_update),
        sample_count = ctx.sample_count,
        temperature_chart = script_json(&ctx.temperature_chart),
        humidity_chart = script_json(&ctx.humidity_chart),
    )
}

fn stat_card(
    label: &str,
    unit: &str,
    last: Option<f64>,
    avg: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
) -> String {
    let with_unit = |value: Option<f64>| match value {
        Some(_) => format!("{} {unit}", format_stat(value)),
        None => format_stat(value),
    };
    format!(
        r#"<div class="card">
          <h2>{label}</h2>
          <div class="value">{last}</div>
          <dl>
            <dt>Average</dt><dd>{avg}</dd>
            <dt>Minimum</dt><dd>{min}</dd>
            <dt>Maximum</dt><dd>{max}</dd>
          </dl>
        </div>"#,
        last = with_unit(last),
        avg = with_unit(avg),
        min = with_unit(min),
        max = with_unit(max),
    )
}

/// Minimal page shown instead of the dashboard when the feed cannot be read.
pub fn error_page(err: &FetchError) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Telemetry Dashboard</title>
  </head>
  <body style="font-family: system-ui; padding: 24px">
    <h1>{}</h1>
  </body>
</html>
"#,
        escape_html(&err.to_string())
    )
}

fn script_json(value: &JsonValue) -> String {
    // `</script>` inside a string literal would end the script element.
    value.to_string().replace("</", "<\\/")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
