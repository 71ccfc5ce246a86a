//! Plain-text rendering of dashboard pages.

use std::fmt::Write as _;

use road_safety_accident_models::{AccidentRecord, Severity};
use road_safety_analytics::{
    HotspotCluster, MonthlySeverity, bounds, most_recent, severity_breakdown,
};
use road_safety_api::history::PredictionHistory;
use road_safety_api_models::{AdminStats, AdminUser, PredictionResult, Stats};
use road_safety_session_models::Session;

/// Clusters listed on the analysis page.
const MAX_CLUSTER_ROWS: usize = 10;

/// Records listed under "recent accidents".
const RECENT_ROWS: usize = 5;

#[must_use]
pub fn session(session: &Session) -> String {
    let mut out = format!(
        "{} <{}> ({}), signed in {}",
        session.name,
        session.email,
        session.role,
        session.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    let contact = &session.contact;
    for (label, value) in [
        ("Phone", &contact.phone),
        ("Address", &contact.address),
        ("City", &contact.city),
        ("Country", &contact.country),
    ] {
        if let Some(value) = value {
            let _ = write!(out, "\n  {label}: {value}");
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[must_use]
pub fn stats(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total accidents: {}", stats.total_accidents);
    for severity in Severity::all().iter().rev() {
        let count = stats.count_for(*severity);
        let _ = writeln!(
            out,
            "  {severity:<8} {count:>6} ({:.1}%)",
            percent(count, stats.total_accidents)
        );
    }
    let _ = writeln!(out, "Model accuracy: {:.1}%", stats.accuracy);
    let _ = write!(out, "Response time: {}", stats.response_time);
    out
}

/// One line per month: slight, serious, and fatal counts.
#[must_use]
pub fn monthly_trend(months: &[MonthlySeverity]) -> String {
    if months.is_empty() {
        return "No accidents in the sample.".to_string();
    }

    let mut out = format!("{:<9} {:>6} {:>7} {:>5}", "Month", "Slight", "Serious", "Fatal");
    for month in months {
        let _ = write!(
            out,
            "\n{:<9} {:>6} {:>7} {:>5}",
            month.label(),
            month.slight,
            month.serious,
            month.fatal
        );
    }
    out
}

/// Severity, confidence, weighted factors (heaviest first), and advice.
#[must_use]
pub fn prediction(result: &PredictionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Severity: {} ({:.1}% confidence)",
        result.severity, result.confidence
    );
    if result.needs_review {
        let _ = writeln!(out, "Low confidence: flagged for expert review");
    }

    let mut factors: Vec<(&String, &f64)> = result.factors.iter().collect();
    factors.sort_by(|a, b| b.1.total_cmp(a.1));
    let _ = writeln!(out, "Contributing factors:");
    for (name, weight) in factors {
        let _ = writeln!(out, "  {name:<20} {:>5.1}%", weight * 100.0);
    }

    let _ = write!(out, "Recommendation: {}", result.recommendation);
    out
}

#[must_use]
pub fn history(history: &PredictionHistory) -> String {
    if history.is_empty() {
        return "No predictions yet.".to_string();
    }

    let mut out = String::new();
    for result in history.iter() {
        let _ = writeln!(
            out,
            "{}  {:<8} {:>5.1}%{}",
            result.timestamp.format("%H:%M:%S"),
            result.severity,
            result.confidence,
            if result.needs_review { "  (review)" } else { "" }
        );
    }
    out.trim_end().to_string()
}

/// Cluster table followed by area bounds, severity mix, and latest records.
#[must_use]
pub fn hotspots(records: &[AccidentRecord], clusters: &[HotspotCluster]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} accidents in {} clusters",
        records.len(),
        clusters.len()
    );

    let mut largest: Vec<&HotspotCluster> = clusters.iter().collect();
    largest.sort_by(|a, b| b.count.cmp(&a.count));
    for cluster in largest.iter().take(MAX_CLUSTER_ROWS) {
        let _ = writeln!(
            out,
            "  ({:.4}, {:.4})  {:>3} accidents  worst {:<8} radius {:.0} m",
            cluster.latitude,
            cluster.longitude,
            cluster.count,
            cluster.most_severe(),
            cluster.radius_meters()
        );
    }

    if let Some(area) = bounds(records) {
        let _ = writeln!(
            out,
            "Area: {:.4},{:.4} to {:.4},{:.4}",
            area.south, area.west, area.north, area.east
        );
    }

    let mix: Vec<String> = severity_breakdown(records)
        .iter()
        .rev()
        .map(|(severity, count)| format!("{severity} {count}"))
        .collect();
    let _ = writeln!(out, "Severity mix: {}", mix.join(", "));

    let _ = write!(out, "Recent:");
    for record in most_recent(records, RECENT_ROWS) {
        let _ = write!(
            out,
            "\n  {}  {:<8} {} / {}",
            record.date.format("%Y-%m-%d"),
            record.severity,
            record.weather,
            record.road_type
        );
    }
    out
}

#[must_use]
pub fn admin(stats: &AdminStats) -> String {
    format!(
        "Users: {} ({} active)\nPredictions: {}\nAccuracy: {:.1}%\nAvg response: {}\nUptime: {}",
        stats.total_users,
        stats.active_users,
        stats.total_predictions,
        stats.accuracy,
        stats.avg_response_time,
        stats.system_uptime
    )
}

#[must_use]
pub fn admin_users(users: &[AdminUser]) -> String {
    let mut out = String::from("Users:");
    for user in users {
        let _ = write!(
            out,
            "\n  {:<14} {:<20} {:<5} {:<8} {:>3} predictions",
            user.name, user.email, user.role, user.status, user.predictions
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use road_safety_api_models::{PredictionInput, UserStatus};
    use road_safety_session_models::{ContactDetails, Role};

    use super::*;

    fn result(confidence: f64) -> PredictionResult {
        PredictionResult {
            id: "1".to_string(),
            severity: Severity::Serious,
            confidence,
            factors: BTreeMap::from([
                ("Rain".to_string(), 0.25),
                ("Moderate Speed".to_string(), 0.30),
            ]),
            needs_review: PredictionResult::confidence_needs_review(confidence),
            recommendation: Severity::Serious.recommendation().to_string(),
            timestamp: Utc::now(),
            conditions: PredictionInput::default(),
        }
    }

    #[test]
    fn prediction_lists_heaviest_factor_first() {
        let text = prediction(&result(78.3));
        assert!(text.starts_with("Severity: Serious (78.3% confidence)"));
        assert!(text.contains("expert review"));
        let speed = text.find("Moderate Speed").unwrap();
        let rain = text.find("Rain").unwrap();
        assert!(speed < rain);
    }

    #[test]
    fn confident_prediction_is_not_flagged() {
        assert!(!prediction(&result(92.5)).contains("review"));
    }

    #[test]
    fn stats_percentages() {
        let text = stats(&Stats {
            total_accidents: 200,
            fatal: 10,
            serious: 50,
            slight: 140,
            accuracy: 87.5,
            response_time: "1.2s".to_string(),
        });
        assert!(text.contains("Fatal"));
        assert!(text.contains("(5.0%)"));
        assert!(text.contains("(70.0%)"));
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        assert!((percent(0, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn session_lists_only_known_contact_details() {
        let mut user = Session {
            id: "1".to_string(),
            name: "Jane User".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::User,
            token: "t".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            contact: ContactDetails::default(),
        };
        assert!(!session(&user).contains('\n'));

        user.contact.city = Some("Leeds".to_string());
        let text = session(&user);
        assert!(text.ends_with("\n  City: Leeds"));
        assert!(!text.contains("Phone"));
    }

    #[test]
    fn monthly_trend_table() {
        let months = [MonthlySeverity {
            year: 2026,
            month: 9,
            slight: 12,
            serious: 5,
            fatal: 1,
        }];
        let text = monthly_trend(&months);
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("Sep 2026"));
        assert!(row.ends_with("1"));
        assert_eq!(monthly_trend(&[]), "No accidents in the sample.");
    }

    #[test]
    fn admin_users_show_status() {
        let text = admin_users(&[AdminUser {
            id: 3,
            name: "Bob Tester".to_string(),
            email: "bob@example.com".to_string(),
            role: Role::User,
            status: UserStatus::Inactive,
            predictions: 8,
        }]);
        assert!(text.contains("Bob Tester"));
        assert!(text.contains("inactive"));
        assert!(text.contains("8 predictions"));
    }

    #[test]
    fn empty_history() {
        assert_eq!(history(&PredictionHistory::default()), "No predictions yet.");
    }
}
