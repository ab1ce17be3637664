use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::pricing::{Quote, RateCard, TierTable};

/// Format a dollar amount with thousands separators: "$1,908.19"
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}

/// Format a multiplier for display: "x0.97"
pub fn format_factor(factor: f64) -> String {
    format!("x{}", factor)
}

/// Format a quote as a multi-line summary: payment options first, then the
/// bid breakdown.
pub fn format_quote(quote: &Quote, use_colors: bool) -> String {
    let payments = &quote.payments;
    let mut lines = Vec::new();

    let heading = format!("Quote for {}", quote.quoted_on.format("%B %-d, %Y"));
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading
    });

    let total = format_money(quote.final_bid);
    lines.push(format!(
        "  Originally quoted:  {}",
        if use_colors {
            total.bold().to_string()
        } else {
            total
        }
    ));
    if payments.seasonal_discount < 1.0 {
        let pct = ((1.0 - payments.seasonal_discount) * 100.0).round();
        let note = format!("  Seasonal discount:  {}% off every option", pct);
        lines.push(if use_colors {
            note.green().to_string()
        } else {
            note
        });
        lines.push(format!(
            "  Standard fee:       {}",
            format_money(payments.standard_before_discounts)
        ));
    }
    lines.push(format!(
        "  Pay upfront:        {}  (9% off)",
        format_money(payments.pay_upfront)
    ));
    lines.push(format!(
        "  50/50 split:        {}  x2",
        format_money(payments.pay_50_50)
    ));
    lines.push(format!(
        "  Pay over time:      {}  x4 ({})",
        format_money(payments.pay_over_time),
        payments.pay_over_time_note
    ));

    lines.push(String::new());
    lines.push("Bids".to_string());
    lines.push(format!("  Linear:             {}", format_money(quote.bids.linear_bid)));
    lines.push(format!("  Logistic:           {}", format_money(quote.bids.logistic_bid)));
    lines.push(format!(
        "  Multi-property:     {}",
        format_money(quote.bids.multi_properties_bid)
    ));
    lines.push(format!("  Base quote:         {}", format_money(quote.base_quote)));

    lines.push(String::new());
    lines.push("Factors".to_string());
    let f = &quote.factors;
    for (label, value) in [
        ("Cost basis", f.cost_basis),
        ("Zip code", f.zip),
        ("Square footage", f.sqft),
        ("Acreage", f.acres),
        ("Property type", f.property_type),
        ("Floors", f.floors),
        ("Multi-property", f.multi_prop),
    ] {
        let label = format!("  {:<20}", format!("{}:", label));
        lines.push(format!(
            "{}{}",
            if use_colors {
                label.dimmed().to_string()
            } else {
                label
            },
            format_factor(value)
        ));
    }

    if !quote.adjustments.steps.is_empty() {
        lines.push(String::new());
        lines.push("Adjustments".to_string());
        for step in &quote.adjustments.steps {
            lines.push(format!(
                "  {:<20}{} ({} -> {})",
                format!("{}:", step.label),
                step.description,
                format_money(step.before),
                format_money(step.after)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Building value {} (land {})",
        format_money(quote.building_value),
        format_money(quote.land_value)
    ));

    lines.join("\n")
}

/// Format a quote as a single tab-separated line for scripting.
/// Columns: final_bid, pay_upfront, pay_50_50, pay_over_time,
/// base_quote, seasonal_discount (no headers, no colors)
pub fn format_tsv(quote: &Quote) -> String {
    let p = &quote.payments;
    format!(
        "{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}",
        quote.final_bid,
        p.pay_upfront,
        p.pay_50_50,
        p.pay_over_time,
        quote.base_quote,
        p.seasonal_discount
    )
}

/// Format every tier table of a rate card, one section per dimension.
pub fn format_tiers(card: &RateCard, use_colors: bool) -> String {
    let tables: [(&str, &TierTable); 5] = [
        ("Cost basis (purchase price + capex)", &card.cost_basis),
        ("Square footage", &card.sqft),
        ("Acreage", &card.acres),
        ("Floors", &card.floors),
        ("Multiple properties", &card.multi_properties),
    ];

    let mut sections: Vec<String> = tables
        .iter()
        .map(|(title, table)| {
            let mut lines = vec![section_title(title, use_colors)];
            for tier in table.tiers() {
                lines.push(format!(
                    "  {:>12}  {}",
                    tier.range.to_string(),
                    format_factor(tier.factor)
                ));
            }
            lines.join("\n")
        })
        .collect();

    let mut lines = vec![section_title("Property type", use_colors)];
    for (property_type, factor) in &card.property_types {
        lines.push(format!(
            "  {:>17}  {}",
            property_type.label(),
            format_factor(*factor)
        ));
    }
    sections.push(lines.join("\n"));

    sections.push(format!(
        "{}\n  4-week: +{}\n  2-week: +{}",
        section_title("Rush fees", use_colors),
        format_money(card.rush_fees.four_week),
        format_money(card.rush_fees.two_week)
    ));

    sections.join("\n\n")
}

fn section_title(title: &str, use_colors: bool) -> String {
    if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}
