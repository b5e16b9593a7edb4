//! Display formatting for CLI output
//!
//! SBIO pattern: Pure functions that format data for display

use super::commands::ValidationReport;
use crate::compiler::{CompiledCluster, VersionMatrix};
use crate::package::PackageReceipt;

// ============================================================================
// Table formatting helpers
// ============================================================================

/// Format a table with upper-cased headers and padded columns
pub fn format_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "No entries.\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let render_row = |cells: Vec<String>| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("   ");
        format!("{}\n", line.trim_end())
    };

    let mut output = render_row(headers.iter().map(|h| h.to_uppercase()).collect());
    for row in rows {
        output.push_str(&render_row(row));
    }
    output
}

// ============================================================================
// Compile display
// ============================================================================

/// Summary printed after a successful compile
pub fn format_compile_summary(
    compiled: &CompiledCluster,
    receipt: Option<&PackageReceipt>,
) -> String {
    let settings = &compiled.settings;
    let lb = &compiled.load_balancer;
    let mut output = String::new();

    output.push_str(&format!("Cluster:        {}\n", settings.cluster_name));
    output.push_str(&format!(
        "Kubernetes:     {} (CRI-O {}, {})\n",
        settings.k8s_version, settings.cri_version, settings.cri_os
    ));
    output.push_str(&format!("Pod CIDR:       {}\n", settings.pod_cidr));
    if let Some(master) = compiled.manifest.primary_master() {
        output.push_str(&format!("Primary master: {}\n", master.hostname));
    }

    if lb.enabled {
        output.push_str(&format!(
            "Load balancer:  {} instance(s), VIP {}, port {}{}\n",
            lb.haproxy_to_configure.len(),
            lb.haproxy_common_cfg.vip,
            lb.ssl.port,
            if lb.ssl.enabled {
                format!(", TLS for {}", lb.ssl.dns)
            } else {
                String::new()
            }
        ));
    } else {
        output.push_str(&format!("Load balancer:  disabled (port {})\n", lb.ssl.port));
    }
    output.push('\n');

    let rows = compiled
        .manifest
        .nodes_to_configure
        .iter()
        .zip(&compiled.node_documents)
        .map(|(node, doc)| {
            vec![
                node.hostname.clone(),
                node.node_type.clone(),
                node.master_type.clone(),
                node.ip.clone(),
                doc.filename.clone(),
            ]
        })
        .collect();
    output.push_str(&format_table(
        &["hostname", "role", "master type", "ip", "file"],
        rows,
    ));

    if let Some(receipt) = receipt {
        output.push_str(&format!(
            "\nWrote {} files ({} bytes) to {}\n",
            receipt.files,
            receipt.bytes,
            receipt.location.display()
        ));
    }

    output
}

// ============================================================================
// Validate display
// ============================================================================

pub fn format_validation(report: &ValidationReport) -> String {
    if report.valid {
        format!(
            "Validation: PASSED\nCluster: {}\nNodes: {}\nLoad balancers: {}\n",
            report.cluster_name.as_deref().unwrap_or(""),
            report.nodes,
            report.load_balancers
        )
    } else {
        format!(
            "Validation: FAILED\n{}\n",
            report.error.as_deref().unwrap_or("unknown error")
        )
    }
}

// ============================================================================
// Versions display
// ============================================================================

pub fn format_versions(matrix: &VersionMatrix) -> String {
    let rows = matrix
        .iter()
        .map(|(k8s, cri)| vec![k8s.to_string(), cri.to_string()])
        .collect();
    format_table(&["kubernetes", "cri-o"], rows)
}
