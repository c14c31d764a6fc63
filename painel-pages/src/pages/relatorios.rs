//! Relatórios: summary counters and period reports

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use painel_api::ReportPeriod;
use painel_core::{Notice, PageContext, PageController, Result};

use crate::render::{definition_list, notice};
use crate::support::input;
use crate::Painel;

const SUMMARY: &str = "#relatorio-resumo";
const RESULT: &str = "#relatorio-resultado";
const GENERATE: &str = "#btn-gerar-relatorio";

pub fn controller() -> Box<dyn PageController<Painel>> {
    Box::new(RelatoriosPage)
}

pub struct RelatoriosPage;

#[async_trait(?Send)]
impl PageController<Painel> for RelatoriosPage {
    async fn mount(&mut self, cx: &PageContext<Painel>) -> Result<()> {
        let summary = match cx.services().api().resumo().await {
            Ok(summary) => definition_list(&summary),
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "Summary unavailable");
                notice("Resumo indisponível no momento.")
            }
        };
        cx.scope().render(SUMMARY, &summary)?;

        let page = cx.clone();
        cx.scope().bind("gerar", GENERATE, "click", move |_| {
            let inicio = input(page.scope(), "#relatorio-inicio");
            let fim = input(page.scope(), "#relatorio-fim");
            match period(inicio.as_deref(), fim.as_deref()) {
                Ok(period) => page.scope().spawn(generate(page.clone(), period)),
                Err(message) => page.scope().notify(Notice::Error, message),
            }
        })?;
        Ok(())
    }
}

/// ISO dates compare correctly as text
fn period(inicio: Option<&str>, fim: Option<&str>) -> std::result::Result<ReportPeriod, &'static str> {
    let period = ReportPeriod::new(inicio, fim);
    if let (Some(inicio), Some(fim)) = (&period.inicio, &period.fim) {
        if inicio > fim {
            return Err("A data inicial deve ser anterior à data final.");
        }
    }
    Ok(period)
}

async fn generate(cx: PageContext<Painel>, period: ReportPeriod) {
    let scope = cx.scope();
    let html = match cx.services().api().relatorio(&period).await {
        Ok(report) => {
            info!(inicio = ?period.inicio, fim = ?period.fim, "Report generated");
            render_report(&report)
        }
        Err(err) => {
            scope.notify(Notice::Error, &err.message());
            notice(&err.message())
        }
    };
    if let Err(err) = scope.render(RESULT, &html) {
        warn!(error = %err, "Failed to render report");
    }
}

/// A report is either one object or a list of rows
fn render_report(report: &Value) -> String {
    match report {
        Value::Array(items) if items.is_empty() => notice("Nenhum registro no período."),
        Value::Array(items) => items.iter().map(definition_list).collect(),
        other => definition_list(other),
    }
}
