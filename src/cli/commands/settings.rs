use neon_config::Config;
use neon_domain::ThemeId;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "theme",
            "Show or change the theme preference",
            "theme [cosmic|forest|ocean|sunset|polar]",
            cmd_theme,
        ),
        CommandEntry::new(
            "config",
            "Show or change application settings",
            "config
             config <key>
             config <key> <value|default>",
            cmd_config,
        ),
    ]
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        let current = context.session.budget().theme();
        output_section("Themes");
        for theme in ThemeId::ALL {
            let marker = if theme == current { "*" } else { " " };
            io::print_info(format!(
                "{marker} {:<8} {}{}",
                theme.as_str(),
                theme.display_name(),
                if theme.is_dark() { "" } else { " (light)" }
            ));
        }
        return Ok(());
    };

    let theme = raw
        .parse::<ThemeId>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    context.session.budget_mut().set_theme(theme)?;
    io::print_success(format!("Theme set to {}", theme.display_name()));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Configuration");
            let config = context.session.config();
            for key in Config::KEYS {
                io::print_info(format!("  {:<20} {}", key, config.get(key)?));
            }
            io::print_info(format!(
                "  Stored at {}",
                context.session.config_path().display()
            ));
            Ok(())
        }
        [key] => {
            io::print_info(format!("{key} = {}", context.session.config().get(key)?));
            Ok(())
        }
        [key, value @ ..] => {
            context.session.update_config(key, &value.join(" "))?;
            io::print_success(format!(
                "Config updated: {key} = {}",
                context.session.config().get(key)?
            ));
            io::print_hint("Storage and display settings apply on the next start.");
            Ok(())
        }
    }
}
