use anyhow::Result;
use colored::Colorize;
use freight_sim::{Outcome, SimulationReport, StatisticsSnapshot};
use std::io::Write;

fn seed_label(report: &SimulationReport) -> String {
    report
        .seed
        .map_or_else(|| "unseeded".to_string(), |seed| format!("seed {seed}"))
}

pub fn generate_console_report(out: &mut dyn Write, reports: &[SimulationReport]) -> Result<()> {
    for report in reports {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("🚚 Delivery Run ({})", seed_label(report))
                .bright_cyan()
                .bold()
        )?;
        writeln!(out, "{}", "=".repeat(32).cyan())?;

        for order in &report.orders {
            match &order.outcome {
                Outcome::Delivered { time, cost, .. } => writeln!(
                    out,
                    "✅ {} ({} via {}, time {time:.2}, cost {cost:.2})",
                    order.summary_line().green(),
                    order.transport,
                    order.road
                )?,
                Outcome::Rejected { reason } => writeln!(
                    out,
                    "❌ {} [{}]",
                    order.summary_line().yellow(),
                    reason.to_string().red()
                )?,
            }
        }

        writeln!(out)?;
        write_console_stats(out, &report.stats)?;
        writeln!(
            out,
            "Delivered: {}  Rejected: {}",
            report.delivered_count().to_string().green(),
            report.rejected_count().to_string().red()
        )?;
    }
    Ok(())
}

fn write_console_stats(out: &mut dyn Write, stats: &StatisticsSnapshot) -> Result<()> {
    writeln!(out, "{}", "📊 Statistics".bright_yellow().bold())?;
    writeln!(out, "{}", "-".repeat(30).yellow())?;

    writeln!(out, "Income by destination:")?;
    for (city, income) in &stats.income {
        writeln!(out, "  {city:20} {income:>10.2}")?;
    }
    writeln!(out, "  {:20} {:>10.2}", "total".bold(), stats.total_income)?;

    writeln!(out, "Delivery times by destination:")?;
    for (city, times) in &stats.delivery_times {
        let listed: Vec<String> = times.iter().map(|t| format!("{t:.2}")).collect();
        let mean = stats.mean_delivery_time.get(city).copied().unwrap_or(0.0);
        writeln!(out, "  {city:20} [{}] mean {mean:.2}", listed.join(", "))?;
    }

    writeln!(out, "Weather losses: {:.2}", stats.weather_losses)?;
    writeln!(out, "Accident losses:")?;
    for (transport, roads) in &stats.accident_losses {
        for (road, loss) in roads {
            writeln!(out, "  {transport} / {road}: {loss:.2}")?;
        }
    }
    writeln!(out, "  total: {:.2}", stats.total_accident_loss)?;
    writeln!(out, "Highway income: {:.2}", stats.highway_income)?;
    writeln!(out, "Regular road income: {:.2}", stats.regular_road_income)?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, reports: &[SimulationReport]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(reports)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, reports: &[SimulationReport]) -> Result<()> {
    writeln!(out, "# Freight Simulation Results\n")?;
    for report in reports {
        writeln!(out, "## Run ({})\n", seed_label(report))?;
        writeln!(
            out,
            "| # | Route | Transport | Road | Weather | Outcome |"
        )?;
        writeln!(out, "|---|-------|-----------|------|---------|---------|")?;
        for order in &report.orders {
            let outcome = match &order.outcome {
                Outcome::Delivered { time, cost, .. } => {
                    format!("✅ delivered (time {time:.2}, cost {cost:.2})")
                }
                Outcome::Rejected { reason } => format!("❌ {reason}"),
            };
            writeln!(
                out,
                "| {} | {} → {} | {} | {} | {} | {} |",
                order.index,
                order.origin,
                order.destination,
                order.transport,
                order.road,
                order.weather,
                outcome
            )?;
        }

        let stats = &report.stats;
        writeln!(out, "\n### Income\n")?;
        writeln!(out, "| Destination | Income | Deliveries | Mean time |")?;
        writeln!(out, "|-------------|--------|------------|-----------|")?;
        for (city, income) in &stats.income {
            let count = stats.delivery_times.get(city).map_or(0, Vec::len);
            let mean = stats.mean_delivery_time.get(city).copied().unwrap_or(0.0);
            writeln!(out, "| {city} | {income:.2} | {count} | {mean:.2} |")?;
        }
        writeln!(out, "\n**Total income:** {:.2}  ", stats.total_income)?;
        writeln!(out, "**Weather losses:** {:.2}  ", stats.weather_losses)?;
        writeln!(
            out,
            "**Accident losses:** {:.2}  ",
            stats.total_accident_loss
        )?;
        writeln!(
            out,
            "**Delivered / rejected:** {} / {}\n",
            report.delivered_count(),
            report.rejected_count()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_sim::{Cargo, TransAgency};

    fn sample_report() -> SimulationReport {
        let mut agency = TransAgency::new();
        agency.add_city("A", true);
        agency.add_city("B", false);
        agency.add_transport("truck", 2.0, 50.0, 0.1);
        agency.add_road("R1", false, 0.0);
        agency.add_weather_condition("sunny", true);
        agency.add_order(Cargo::new(10.0), "A", "B", 1000.0, 1000.0);
        agency.add_order(Cargo::new(10.0), "A", "B", 1000.0, 0.5);
        agency.simulate_with_seed(42).unwrap()
    }

    fn render(f: fn(&mut dyn Write, &[SimulationReport]) -> Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf, &[sample_report()]).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn console_report_lists_outcomes_and_stats() {
        let text = render(generate_console_report);
        assert!(text.contains("Delivery Run (seed 42)"));
        assert!(text.contains("Order from A to B delivered successfully"));
        assert!(text.contains("[cost exceeds desired]"));
        assert!(text.contains("truck / R1: 10.00"));
        assert!(text.contains("Weather losses: 0.00"));
    }

    #[test]
    fn json_report_round_trips() {
        let text = render(generate_json_report);
        let parsed: Vec<SimulationReport> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec![sample_report()]);
    }

    #[test]
    fn markdown_report_has_tables() {
        let text = render(generate_markdown_report);
        assert!(text.starts_with("# Freight Simulation Results"));
        assert!(text.contains("| 0 | A → B | truck | R1 | sunny |"));
        assert!(text.contains("**Delivered / rejected:** 1 / 1"));
    }
}
