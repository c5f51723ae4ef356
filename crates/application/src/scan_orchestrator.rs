use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use shutoff_core::{AppResult, ScanPassId};

use crate::inventory_ports::RegionDirectory;
use crate::resource_scanner::{ResourceScanner, ScanReport};

/// Region and kind pairs scanned at the same time unless configured.
pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Totals of one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Identifier attached to the pass logs.
    pub pass_id: ScanPassId,
    /// Regions reported by the region directory.
    pub regions: usize,
    /// Region and kind pairs scanned to completion.
    pub pairs_succeeded: usize,
    /// Region and kind pairs that failed.
    pub pairs_failed: usize,
    /// Notifications delivered.
    pub notified: usize,
    /// Notifications that could not be prepared or delivered.
    pub failed_notifications: usize,
}

impl PassSummary {
    fn new(pass_id: ScanPassId, regions: usize) -> Self {
        Self {
            pass_id,
            regions,
            pairs_succeeded: 0,
            pairs_failed: 0,
            notified: 0,
            failed_notifications: 0,
        }
    }

    fn record(&mut self, report: &ScanReport) {
        self.pairs_succeeded += 1;
        self.notified += report.notified;
        self.failed_notifications += report.failed;
    }
}

/// Runs every scanner against every enabled region.
#[derive(Clone)]
pub struct ScanOrchestrator {
    region_directory: Arc<dyn RegionDirectory>,
    scanners: Vec<ResourceScanner>,
    concurrency: usize,
}

impl ScanOrchestrator {
    /// Creates an orchestrator with the default concurrency.
    #[must_use]
    pub fn new(region_directory: Arc<dyn RegionDirectory>, scanners: Vec<ResourceScanner>) -> Self {
        Self {
            region_directory,
            scanners,
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Overrides how many region and kind pairs run at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runs one full scan pass.
    ///
    /// Only a failure to list regions fails the pass. A failing region and
    /// kind pair is logged and counted while the others keep going.
    pub async fn run(&self) -> AppResult<PassSummary> {
        let pass_id = ScanPassId::new();
        let regions = self.region_directory.list_regions().await?;
        info!(
            pass_id = %pass_id,
            regions = regions.len(),
            kinds = self.scanners.len(),
            "scan pass started"
        );

        let pairs = regions.iter().flat_map(|region| {
            self.scanners
                .iter()
                .map(move |scanner| (region.as_str(), scanner))
        });

        let outcomes: Vec<(&str, &ResourceScanner, AppResult<ScanReport>)> = stream::iter(pairs)
            .map(|(region, scanner)| async move { (region, scanner, scanner.scan(region).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = PassSummary::new(pass_id, regions.len());
        for (region, scanner, outcome) in outcomes {
            match outcome {
                Ok(report) => {
                    info!(
                        pass_id = %pass_id,
                        kind = %report.kind,
                        region = %report.region,
                        running = report.running,
                        attributed = report.attributed,
                        notified = report.notified,
                        failed = report.failed,
                        "region scanned"
                    );
                    summary.record(&report);
                }
                Err(error) => {
                    summary.pairs_failed += 1;
                    warn!(
                        pass_id = %pass_id,
                        kind = %scanner.kind(),
                        region,
                        error = %error,
                        "region scan failed"
                    );
                }
            }
        }

        info!(
            pass_id = %pass_id,
            pairs_succeeded = summary.pairs_succeeded,
            pairs_failed = summary.pairs_failed,
            notified = summary.notified,
            failed_notifications = summary.failed_notifications,
            "scan pass finished"
        );

        Ok(summary)
    }
}
