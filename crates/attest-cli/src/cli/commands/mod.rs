use crate::cli::args::*;
use attest_core::config::ProviderConfig;
use attest_core::engine::validator::Validator;
use attest_core::errors::ValidateError;
use attest_core::model::EvidenceStatus;
use attest_core::providers::llm::build_client;
use attest_core::storage::files::LocalFileStore;
use attest_core::storage::store::Store;
use std::sync::Arc;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let store = Store::open(&cli.db)?;
    store.init_schema()?;

    let files = Arc::new(LocalFileStore::new(cli.data_dir.clone()));
    let provider = ProviderConfig::from_env();
    let validator = Validator::new(store, files, build_client(&provider));

    match cli.cmd {
        Command::Upload(args) => upload(&validator, args).await,
        Command::Validate(args) => validate(&validator, args).await,
        Command::List(args) => list(&validator, args).await,
        Command::Show(args) => show(&validator, args).await,
        Command::Delete(args) => delete(&validator, args).await,
        Command::Health(args) => health(&validator, &provider, args).await,
    }
}

async fn upload(v: &Validator, args: UploadArgs) -> anyhow::Result<i32> {
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = tokio::fs::read(&args.file).await?;
    let content_type = args
        .content_type
        .unwrap_or_else(|| guess_content_type(&file_name).to_string());

    match v
        .upload(&file_name, &bytes, &content_type, &args.uploaded_by)
        .await
    {
        Ok(item) => {
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(0)
        }
        Err(e) => report(e),
    }
}

async fn validate(v: &Validator, args: ValidateArgs) -> anyhow::Result<i32> {
    match v.validate(&args.id, args.principal.as_deref()).await {
        Ok(out) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("validated {} with {}", args.id, out.model);
                println!(
                    "  {} -> {} {} ({})",
                    out.result.evidence_type,
                    out.result.mapped_control.framework,
                    out.result.mapped_control.control_id,
                    out.result.mapped_control.control_name
                );
                println!(
                    "  completeness: {:.0}/100 in {} ms",
                    out.result.completeness_score, out.processing_time_ms
                );
                for issue in &out.result.issues {
                    println!("  issue: {}", serde_json::to_string(issue)?);
                }
            }
            Ok(0)
        }
        Err(e) => report(e),
    }
}

async fn list(v: &Validator, args: ListArgs) -> anyhow::Result<i32> {
    let status = args.status.as_deref().map(EvidenceStatus::parse);
    let items = v
        .store
        .list_items(args.principal.as_deref(), status, args.limit, args.offset)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            let latest = v.store.latest_result(&item.id)?;
            let score = latest
                .map(|r| format!("{:.0}", r.result.completeness_score))
                .unwrap_or_else(|| "-".into());
            println!(
                "{}  {:<11} score={:<4} {}  ({})",
                item.id,
                item.status.as_str(),
                score,
                item.file_name,
                item.detected_evidence_type.as_deref().unwrap_or("unclassified"),
            );
        }
        eprintln!("{} item(s)", items.len());
    }
    Ok(0)
}

async fn show(v: &Validator, args: ShowArgs) -> anyhow::Result<i32> {
    match v.show(&args.id, args.principal.as_deref()).await {
        Ok((item, results, url)) => {
            if args.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "item": item,
                        "results": results,
                        "file_url": url,
                    }))?
                );
            } else {
                println!("{} ({}, {} bytes)", item.file_name, item.file_type, item.file_size);
                println!("  id: {}", item.id);
                println!("  status: {}", item.status.as_str());
                println!("  uploaded: {} by {}", item.uploaded_at, item.uploaded_by);
                if let Some(t) = &item.detected_evidence_type {
                    println!("  detected type: {}", t);
                }
                if let Some(u) = &url {
                    println!("  file: {}", u);
                }
                println!("  validation runs: {}", results.len());
                for r in &results {
                    println!(
                        "    {}  {}  score={:.0}  {} ms",
                        r.created_at, r.model, r.result.completeness_score, r.processing_time_ms
                    );
                }
            }
            Ok(0)
        }
        Err(e) => report(e),
    }
}

async fn delete(v: &Validator, args: DeleteArgs) -> anyhow::Result<i32> {
    match v.delete(&args.id, args.principal.as_deref()).await {
        Ok(()) => {
            println!("deleted {}", args.id);
            Ok(0)
        }
        Err(e) => report(e),
    }
}

async fn health(v: &Validator, provider: &ProviderConfig, args: HealthArgs) -> anyhow::Result<i32> {
    let status = v.health().await;
    if args.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "active_provider": provider.provider_name(),
                "ai": status,
            }))?
        );
    } else {
        println!("provider: {}", provider.provider_name());
        println!("available: {}", status.available);
        if let Some(e) = &status.error {
            println!("error: {}", e);
        }
        if !status.models.is_empty() {
            println!("models: {}", status.models.join(", "));
        }
        println!(
            "text model: {}  vision model: {}",
            if status.has_text_model { "ok" } else { "missing" },
            if status.has_vision_model { "ok" } else { "missing" },
        );
    }
    Ok(if status.available { 0 } else { 1 })
}

fn report(e: ValidateError) -> anyhow::Result<i32> {
    eprintln!("error: {}", e);
    Ok(1)
}

fn guess_content_type(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) => match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "csv" => "text/csv",
            "pdf" => "application/pdf",
            "txt" | "log" | "md" => "text/plain",
            "json" => "application/json",
            _ => "application/octet-stream",
        },
        None => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::guess_content_type;

    #[test]
    fn content_type_guessing() {
        assert_eq!(guess_content_type("shot.PNG"), "image/png");
        assert_eq!(guess_content_type("users.csv"), "text/csv");
        assert_eq!(guess_content_type("policy.txt"), "text/plain");
        assert_eq!(guess_content_type("blob"), "application/octet-stream");
    }
}
