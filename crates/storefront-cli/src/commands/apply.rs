use std::sync::Arc;

use storefront_core::domain::{Coupon, Order, Product, Resource, Review};
use storefront_core::{apply_with, Diagnostic, IdGenerator, Mutation, UuidIds};

use crate::app::AppContext;
use crate::cli::{ApplyAction, ApplyArgs, Kind};
use crate::errors::CliError;
use crate::helpers::{parse_field_value, read_record_json};
use crate::output::{apply_json, print_json};
use crate::ui::{badge, hint, print, receipt, Badge, OutputMode};

pub fn handle_apply(ctx: &AppContext, args: &ApplyArgs) -> anyhow::Result<()> {
    match args.kind {
        Kind::Products => apply::<Product>(ctx, args),
        Kind::Orders => apply::<Order>(ctx, args),
        Kind::Coupons => apply::<Coupon>(ctx, args),
        Kind::Reviews => apply::<Review>(ctx, args),
    }
}

/// Record the receipt should point at once the mutation has run.
enum Target {
    Id(String),
    Last,
    None,
}

fn apply<R: Resource>(ctx: &AppContext, args: &ApplyArgs) -> anyhow::Result<()> {
    let records = ctx.load::<R>()?;
    let (mutation, target) = build_mutation::<R>(&args.action)?;
    let mutation_name = mutation.name();

    let mut diagnostics = Vec::new();
    let next = apply_with(&records, mutation, &mut |d: &Diagnostic| {
        diagnostics.push(d.clone())
    });
    let changed = !next.ptr_eq(&records);

    if !changed {
        if let Some(err) = rejection(R::KIND, &diagnostics) {
            return Err(err.into());
        }
    }

    let saved = changed && !args.dry_run;
    if saved {
        ctx.save(&next)?;
        tracing::info!(
            kind = R::KIND,
            mutation = mutation_name,
            count = next.len(),
            "snapshot saved"
        );
    }

    let record = match &target {
        Target::Id(id) if changed => next.find(id).map(|record| &**record),
        Target::Last if changed => next.iter().last(),
        _ => None,
    };

    let ui_ctx = ctx.ui_context(args.json, None);
    if ui_ctx.mode.is_json() {
        return print_json(&apply_json(
            R::KIND,
            mutation_name,
            changed,
            saved,
            next.len(),
            record,
            &diagnostics,
        ));
    }

    if !changed {
        match ui_ctx.mode {
            OutputMode::Pretty => print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Info, &format!("{} unchanged", R::KIND)),
            ),
            OutputMode::Plain | OutputMode::Json => println!("status=unchanged"),
        }
        return Ok(());
    }

    if ctx.quiet() {
        return Ok(());
    }

    let title = if saved {
        format!("Applied {} to {}", mutation_name, R::KIND)
    } else {
        format!("Dry run: {} on {}", mutation_name, R::KIND)
    };
    let mut items = vec![("Mutation", mutation_name.to_string())];
    if let Some(record) = record {
        items.push(("Id", record.id().to_string()));
    }
    items.push(("Records", next.len().to_string()));
    items.push(("Saved", saved.to_string()));
    print(&ui_ctx, &receipt(&ui_ctx, &title, &items));

    if args.dry_run && ui_ctx.mode.is_pretty() {
        print(&ui_ctx, &hint(&ui_ctx, "Run again without --dry-run to write the snapshot."));
    }

    Ok(())
}

fn build_mutation<R: Resource>(action: &ApplyAction) -> anyhow::Result<(Mutation<R>, Target)> {
    let built = match action {
        ApplyAction::Toggle { id, field } => {
            (Mutation::toggle(id.as_str(), field.as_str()), Target::Id(id.clone()))
        }
        ApplyAction::Set { id, field, value } => {
            let value = parse_field_value(&R::accessors(), field, value)?;
            (
                Mutation::update(id.as_str(), field.as_str(), value),
                Target::Id(id.clone()),
            )
        }
        ApplyAction::Remove { id } => (Mutation::remove(id.as_str()), Target::None),
        ApplyAction::Clear => (Mutation::RemoveAll, Target::None),
        ApplyAction::Duplicate { id } => {
            let ids: Arc<dyn IdGenerator> = Arc::new(UuidIds);
            (Mutation::duplicate(id.as_str(), ids), Target::Last)
        }
        ApplyAction::Append { record } => {
            let mut record: R = read_record_json(record)?;
            if record.id().trim().is_empty() {
                record.set_id(UuidIds.next_id());
            }
            (Mutation::append(record), Target::Last)
        }
    };
    Ok(built)
}

/// Turn a no-op caused by a bad target into an error with an exit code.
fn rejection(kind: &str, diagnostics: &[Diagnostic]) -> Option<CliError> {
    diagnostics.iter().find_map(|diagnostic| match diagnostic {
        Diagnostic::RecordNotFound { id } => Some(CliError::not_found(
            format!("No {} record with id \"{}\"", kind, id),
            format!("Hint: Run `storefront list {} --format plain` to find ids.", kind),
        )),
        Diagnostic::FieldRejected { reason, .. } => Some(CliError::invalid_input(reason.clone())),
        Diagnostic::DuplicateId { id } => Some(CliError::invalid_input(format!(
            "A {} record with id \"{}\" already exists",
            kind, id
        ))),
        _ => None,
    })
}
