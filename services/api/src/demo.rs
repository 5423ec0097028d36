use crate::infra::{InMemoryEvaluationRepository, InMemorySelectionRepository};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use sourcing_ai::error::AppError;
use sourcing_ai::workflows::sourcing::{
    export_filename, export_matrix, ranked_views, CriteriaCatalog, EvaluationService,
    EvaluationServiceError, SourcingEventId, Vendor, VendorId,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Sourcing event identifier used for the demo run.
    #[arg(long, default_value = "SRC-2025-001")]
    pub(crate) event_id: String,
    /// Buying organization stamped on the seeded evaluation rows.
    #[arg(long, default_value = "org-demo")]
    pub(crate) organization: String,
    /// Print every matrix cell after human sign-off.
    #[arg(long)]
    pub(crate) list_cells: bool,
    /// Stop after ranking; skip the submission and approval walkthrough.
    #[arg(long)]
    pub(crate) skip_approval: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Sourcing event identifier used for the demo matrix.
    #[arg(long, default_value = "SRC-2025-001")]
    pub(crate) event_id: String,
    /// Buying organization stamped on the seeded evaluation rows.
    #[arg(long, default_value = "org-demo")]
    pub(crate) organization: String,
}

fn demo_vendors() -> Vec<Vendor> {
    vec![
        Vendor {
            id: VendorId("northwind".to_string()),
            name: "Northwind Industrial".to_string(),
        },
        Vendor {
            id: VendorId("cascade".to_string()),
            name: "Cascade Supply".to_string(),
        },
        Vendor {
            id: VendorId("harbor".to_string()),
            name: "Harbor Logistics".to_string(),
        },
    ]
}

fn demo_service() -> Arc<EvaluationService<InMemoryEvaluationRepository, InMemorySelectionRepository>>
{
    Arc::new(EvaluationService::new(
        CriteriaCatalog::standard(),
        Arc::new(InMemoryEvaluationRepository::default()),
        Arc::new(InMemorySelectionRepository::default()),
    ))
}

// Canned reviewer scores: a per-vendor base nudged per criterion so the demo
// produces a stable, readable ranking.
fn demo_manual_score(vendor: &VendorId, criterion_index: usize) -> f64 {
    let base: f64 = match vendor.0.as_str() {
        "northwind" => 88.0,
        "cascade" => 81.0,
        _ => 76.5,
    };
    let adjustments = [0.0, -2.5, 1.5, -1.0, 3.0, -4.0, 2.0];
    let adjustment = adjustments[criterion_index % adjustments.len()];
    (base + adjustment).clamp(0.0, 100.0)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        event_id,
        organization,
        list_cells,
        skip_approval,
    } = args;

    let event = SourcingEventId(event_id);
    let vendors = demo_vendors();
    let service = demo_service();

    println!("Sourcing evaluation demo");
    println!("Event {} | organization {}", event, organization);

    let seeded = service.open_event(&event, &vendors, &organization)?;
    println!(
        "\nSeeded {} cells ({} vendors x {} criteria), AI suggestions only",
        seeded.len(),
        vendors.len(),
        service.catalog().len()
    );

    let preliminary = service.summaries(&event)?;
    println!("\nPreliminary ranking (AI suggestions, non-binding)");
    for view in ranked_views(&preliminary) {
        println!(
            "- #{} {} | weighted {:.2} | {} AI-sourced cells",
            view.rank, view.vendor_id, view.weighted_score, view.ai_sourced_cells
        );
    }

    for row in &seeded {
        let criterion_index = service
            .catalog()
            .criteria()
            .iter()
            .position(|criterion| criterion.name == row.criteria_name)
            .unwrap_or(0);
        let score = demo_manual_score(&row.vendor_id, criterion_index);
        service.record_manual_score(&row.id, score, "buyer@demo.test")?;
    }

    let report = service.completion(&event)?;
    println!(
        "\nCompletion after human sign-off: {:.1}%",
        report.overall_percent
    );
    for (vendor, progress) in &report.per_vendor {
        println!("- {}: {}/{} cells", vendor, progress.filled, progress.total);
    }

    let summaries = service.summaries(&event)?;
    println!("\nFinal ranking");
    for view in ranked_views(&summaries) {
        println!(
            "- #{} {} | total {:.2} | weighted {:.2}",
            view.rank, view.vendor_id, view.total_score, view.weighted_score
        );
    }

    if list_cells {
        println!("\nMatrix cells");
        for summary in &summaries {
            for row in &summary.evaluations {
                let effective = row.effective_score();
                println!(
                    "- {} | {} | effective {:.1} ({})",
                    row.vendor_id,
                    row.criteria_name,
                    effective.value,
                    if effective.ai_sourced { "ai" } else { "manual" }
                );
            }
        }
    }

    if let Some(candidate) = service.candidate_winner(&event)? {
        println!(
            "\nCandidate winner: {} (weighted {:.2})",
            candidate.vendor_id, candidate.weighted_score
        );
    }

    if skip_approval {
        return Ok(());
    }

    let selection = service.submit_for_approval(
        &event,
        "buyer@demo.test",
        Some("Highest weighted score across the rubric".to_string()),
    )?;
    println!(
        "\nSubmitted selection {} -> {} ({})",
        selection.id,
        selection.winner_vendor_id,
        selection.approval_status.label()
    );

    let pending = service.pending_approvals(&organization)?;
    println!("Pending approvals for {}: {}", organization, pending.len());

    let approved = service.approve_winner(&selection.id, "cpo@demo.test")?;
    println!(
        "Approved by {} on {}",
        approved.approved_by.as_deref().unwrap_or("unknown"),
        approved
            .approval_date
            .map(|date| date.to_rfc3339())
            .unwrap_or_default()
    );

    // The seeded rows predate the manual overrides; the summaries carry the
    // refreshed cells.
    let rows: Vec<_> = summaries
        .iter()
        .flat_map(|summary| summary.evaluations.iter().cloned())
        .collect();
    let matrix = export_matrix(service.catalog(), &vendors, &rows, &summaries)
        .map_err(EvaluationServiceError::from)?;
    println!(
        "\nCSV export ({})",
        export_filename(&event, Utc::now().timestamp_millis())
    );
    print!("{matrix}");

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        event_id,
        organization,
    } = args;

    let event = SourcingEventId(event_id);
    let vendors = demo_vendors();
    let service = demo_service();

    let seeded = service.open_event(&event, &vendors, &organization)?;
    let rows: Vec<_> = seeded
        .iter()
        .map(|row| service.accept_recommendation(&row.id, "buyer@demo.test"))
        .collect::<Result<_, _>>()?;
    let summaries = service.summaries(&event)?;
    let matrix = export_matrix(service.catalog(), &vendors, &rows, &summaries)
        .map_err(EvaluationServiceError::from)?;
    print!("{matrix}");

    Ok(())
}
