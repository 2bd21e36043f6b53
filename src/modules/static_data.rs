//! User-authored assumptions and benchmarks. They carry static props only, so
//! they can be pinned to the report like any computed analysis.

use super::{ComponentKind, Layout, ModuleDescriptor};
use crate::views::ViewGroup;
use serde_json::json;

fn assumption(
    id: &str,
    title: &str,
    explanation: &str,
    value: &str,
    source: &str,
    justification: &str,
) -> ModuleDescriptor {
    ModuleDescriptor::new(id, title, ComponentKind::StaticDataItem, ViewGroup::Data)
        .with_explanation(explanation)
        .with_props(json!({
            "data": {
                "Value": value,
                "Source": source,
                "Justification": justification
            }
        }))
}

pub fn collection() -> Vec<ModuleDescriptor> {
    vec![
        assumption(
            "assumption-efficiency",
            "System Efficiency Assumption",
            "Core assumption for system round-trip efficiency, including all subsystems.",
            "95%",
            "Internal Cost Model V2.1, Q2 2024",
            "Bottom-up estimate for a 150 GWh system including refractories, power electronics, \
             and EPC. +/- 2% uncertainty.",
        ),
        assumption(
            "assumption-capital-costs",
            "Capital Cost Assumption",
            "Projected capital expenditure for the pilot system installation.",
            "$1.3M",
            "Vendor Quote #A48-C2, Q1 2024",
            "Firm quote for a 10 MWth pilot system. Excludes land acquisition costs. Valid for \
             90 days.",
        ),
        assumption(
            "assumption-labor",
            "Operating Labor Assumption",
            "Estimated labor requirement for continuous plant operation.",
            "0.5 FTE",
            "Operational Plan rev 3",
            "Assumes automated control system with on-call remote supervision. One full-time \
             operator can supervise two equivalent systems.",
        ),
        ModuleDescriptor::new(
            "benchmark-lcoh",
            "LCOH Benchmarks",
            ComponentKind::BenchmarkTable,
            ViewGroup::Data,
        )
        .with_layout(Layout::FullWidth)
        .with_explanation(
            "Comparative LCOH benchmarks for alternative heating technologies under baseline \
             assumptions.",
        )
        .with_props(json!({
            "headers": [
                "Technology",
                "Fuel Price ($/MMBtu)",
                "Carbon Tax ($/tonne)",
                "Boiler Efficiency (%)",
                "Boiler CAPEX ($/MWth)",
                "Estimated LCOH ($/Unit)"
            ],
            "rows": [
                ["Natural Gas Boiler", "3.50", "0", "85", "150,000", "850"],
                ["Natural Gas Boiler (w/ Tax)", "3.50", "50", "85", "150,000", "980"],
                ["Electric Resistance Boiler", "8.79", "0", "99", "100,000", "1150"]
            ]
        })),
    ]
}
