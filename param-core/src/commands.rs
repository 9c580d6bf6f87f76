//! Built-in console commands.
//!
//! [`BUILTINS`] is the complete command set of the configuration console.
//! Everything that touches hardware goes through the [`Engine`] held by the
//! [`Shell`].
//!
//! [`Engine`]: crate::Engine

use param_text::{parse_float, parse_int};

use crate::access::ParamError;
use crate::command::{Command, CommandTable, Shell};
use crate::engine::{ResetKind, IDENTITY_RC_MAP, RC_CHANNEL_COUNT, RC_CHANNEL_LETTERS};
use crate::name::starts_with_ignore_case;
use crate::types::Value;

/// Printed when `set` names no parameter.
pub const UNKNOWN_PARAMETER: &str = "ERR: Unknown variable name";

/// Printed when `set` is given a value outside the parameter's bounds.
pub const OUT_OF_RANGE: &str = "ERR: Value assignment out of range";

/// Printed when a command's arguments cannot be used.
pub const BAD_ARGUMENTS: &str = "That was Harakiri, try 'help'";

/// Three activation bits per aux channel fit ten channels in a `u32`.
const MAX_AUX_CHANNELS: usize = 10;

const COMMANDS: &[Command] = &[
    Command::new("auxset", "alternative to GUI", cmd_auxset),
    Command::new("default", "load defaults & reboot", cmd_default),
    Command::new("dump", "dump config", cmd_dump),
    Command::new("exit", "exit & reboot", cmd_exit),
    Command::new("feature", "list or -val or val", cmd_feature),
    Command::new("flash", "flashmode", cmd_flash),
    Command::new("help", "this text", cmd_help),
    Command::new("map", "mapping of rc channel order", cmd_map),
    Command::new("mixer", "mixer name or list", cmd_mixer),
    Command::new("save", "save and reboot", cmd_save),
    Command::new("set", "name=value or blank or * for list", cmd_set),
    Command::new("status", "sys status & stats", cmd_status),
    Command::new("version", "", cmd_version),
];

/// The configuration console's command table.
pub const BUILTINS: CommandTable = CommandTable::new(COMMANDS);

/// `auxset` shows the aux switch table; `auxset [-]ID AUX L|M|H` sets or
/// clears one activation bit.
fn cmd_auxset(shell: &mut Shell<'_, '_>, args: &str) {
    let args = args.trim();
    let boxes = shell.engine().box_names();
    let aux_channels = shell.engine().aux_channels().min(MAX_AUX_CHANNELS);

    if args.len() < 5 {
        shell.print("\r\nSet: auxset ID aux state(H/M/L)\r\n");
        shell.print("Remove: auxset -ID etc.\r\n");
        shell.print("Ex: auxset 1 4 h Sets Box 1 to Aux4 High\r\n\r\n");
        shell.print("ID|AUXCHAN :");
        for channel in 1..=aux_channels {
            shell.print_fmt(format_args!(" {:02}  ", channel));
        }
        for (index, name) in boxes.iter().enumerate() {
            shell.print_fmt(format_args!("\r\n{:02}|{:<8.8}:", index, name));
            let mask = shell.engine().box_activation(index);
            for channel in 0..aux_channels {
                let bits = mask >> (channel * 3);
                let low = if bits & 1 != 0 { 'L' } else { '-' };
                let mid = if bits & 2 != 0 { 'M' } else { '-' };
                let high = if bits & 4 != 0 { 'H' } else { '-' };
                shell.print_fmt(format_args!(" {}{}{} ", low, mid, high));
            }
        }
        shell.print("\r\n");
        return;
    }

    let (remove, rest) = match args.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, args),
    };
    let mut fields = rest.split_ascii_whitespace();
    let index = fields.next().and_then(|f| f.parse::<usize>().ok());
    let channel = fields.next().and_then(|f| f.parse::<usize>().ok());
    let level = fields.next().and_then(|f| f.bytes().next());

    let (Some(index), Some(channel), Some(level)) = (index, channel, level) else {
        shell.print(BAD_ARGUMENTS);
        return;
    };
    let Some(name) = boxes.get(index) else {
        shell.print(BAD_ARGUMENTS);
        return;
    };
    if channel == 0 || channel > aux_channels {
        shell.print(BAD_ARGUMENTS);
        return;
    }
    let (bit, label) = match level.to_ascii_uppercase() {
        b'L' => (0, "LOW"),
        b'M' => (1, "MED"),
        b'H' => (2, "HIGH"),
        _ => {
            shell.print(BAD_ARGUMENTS);
            return;
        }
    };

    let flag = 1u32 << ((channel - 1) * 3 + bit);
    let mask = shell.engine().box_activation(index);
    if remove {
        shell.engine().set_box_activation(index, mask & !flag);
        shell.print("Removing ");
    } else {
        shell.engine().set_box_activation(index, mask | flag);
        shell.print("Setting ");
    }
    shell.print_fmt(format_args!("{} Aux {:02} {}", name, channel, label));
}

fn cmd_default(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print("Resetting to defaults...\r\n");
    shell.engine().load_defaults();
    shell.print("Rebooting...");
    shell.request_exit(ResetKind::Warm);
}

fn cmd_dump(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print(";Actual Config:\r\n");
    {
        let (out, engine) = shell.split();
        out.print(";Firmware: ");
        out.print(engine.firmware());
        out.print("\r\n");
    }

    cmd_auxset(shell, "");
    if let Some(name) = current_mixer(shell) {
        shell.print_fmt(format_args!("mixer {}\r\n", name));
    }
    cmd_feature(shell, "");
    shell.print("map ");
    print_rc_map(shell);
    shell.print("\r\n");

    let registry = shell.registry();
    for param in registry.iter() {
        shell.print_fmt(format_args!(
            "set {} = {}\r\n",
            param.name(),
            param.format(false)
        ));
    }
}

fn cmd_exit(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print("\r\nLeaving CLI mode without saving\r\n");
    shell.print("\r\nRebooting...");
    shell.request_exit(ResetKind::Warm);
}

fn cmd_feature(shell: &mut Shell<'_, '_>, args: &str) {
    let args = args.trim();
    let names = shell.engine().feature_names();
    let mask = shell.engine().features();

    if args.is_empty() {
        shell.print("Enabled features: ");
        for (bit, name) in names.iter().enumerate().take(32) {
            if mask & (1 << bit) != 0 {
                shell.print_fmt(format_args!("{} ", name));
            }
        }
        shell.print("\r\n");
        return;
    }

    if starts_with_ignore_case("list", args) {
        shell.print("Available features: \r\n");
        for name in names {
            shell.print_fmt(format_args!("{} \r\n", name));
        }
        shell.print("\r\n");
        return;
    }

    let (remove, wanted) = match args.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, args),
    };
    let found = names
        .iter()
        .enumerate()
        .take(32)
        .find(|(_, name)| !wanted.is_empty() && starts_with_ignore_case(name, wanted));

    match found {
        Some((bit, name)) => {
            if remove {
                shell.engine().set_features(mask & !(1 << bit));
                shell.print("Disabled ");
            } else {
                shell.engine().set_features(mask | (1 << bit));
                shell.print("Enabled ");
            }
            shell.print_fmt(format_args!("{}\r\n", name));
        }
        None => shell.print("Invalid feature name\r\n"),
    }
}

fn cmd_flash(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print("Close terminal & flash\r\n");
    shell.request_exit(ResetKind::Bootloader);
}

fn cmd_help(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print("Available commands:\r\n\r\n");
    for cmd in shell.commands().commands() {
        shell.print_fmt(format_args!("{}\t {}\r\n", cmd.name, cmd.help));
    }
}

/// `map` shows the RC channel order; `map` followed by eight letters, any
/// order of `AETR1234`, sets it.
fn cmd_map(shell: &mut Shell<'_, '_>, args: &str) {
    let args = args.trim();
    if args.len() == RC_CHANNEL_COUNT {
        match parse_rc_map(args.as_bytes()) {
            Some(map) => shell.engine().set_rc_map(map),
            None => {
                shell.print("Must be any order of AETR1234\r\n");
                return;
            }
        }
    }
    shell.print("Current assignment: ");
    print_rc_map(shell);
    shell.print("\r\n");
}

/// Input position of each function, from the letters in input order.
fn parse_rc_map(letters: &[u8]) -> Option<[u8; RC_CHANNEL_COUNT]> {
    let mut map = IDENTITY_RC_MAP;
    let mut seen = [false; RC_CHANNEL_COUNT];
    for (position, &letter) in letters.iter().enumerate() {
        let function = RC_CHANNEL_LETTERS
            .iter()
            .position(|&l| l == letter.to_ascii_uppercase())?;
        if seen[function] {
            return None;
        }
        seen[function] = true;
        map[function] = position as u8;
    }
    Some(map)
}

fn print_rc_map(shell: &mut Shell<'_, '_>) {
    let mut text = [b'-'; RC_CHANNEL_COUNT];
    for (function, &position) in shell.engine().rc_map().iter().enumerate() {
        if let Some(slot) = text.get_mut(usize::from(position)) {
            *slot = RC_CHANNEL_LETTERS[function];
        }
    }
    shell.write_bytes(&text);
}

fn cmd_mixer(shell: &mut Shell<'_, '_>, args: &str) {
    let args = args.trim();
    let names = shell.engine().mixer_names();

    if args.is_empty() {
        if let Some(name) = current_mixer(shell) {
            shell.print_fmt(format_args!("Current mixer: {}\r\n", name));
        }
        return;
    }

    if starts_with_ignore_case("list", args) {
        shell.print("Available mixers: ");
        for name in names {
            shell.print_fmt(format_args!("{} ", name));
        }
        shell.print("\r\n");
        return;
    }

    match names
        .iter()
        .position(|name| starts_with_ignore_case(name, args))
    {
        Some(index) => {
            shell.engine().set_mixer(index);
            shell.print_fmt(format_args!("Mixer set to {}\r\n", names[index]));
        }
        None => shell.print("Invalid mixer type...\r\n"),
    }
}

fn cmd_save(shell: &mut Shell<'_, '_>, _args: &str) {
    shell.print("Saving...");
    let registry = shell.registry();
    match shell.engine().save(registry) {
        Ok(()) => {
            shell.print("\r\nRebooting...");
            shell.request_exit(ResetKind::Warm);
        }
        Err(err) => {
            warn!("console save failed: {}", err);
            shell.print_fmt(format_args!("\r\nERR: {}", err));
        }
    }
}

/// `set`, `set *`, `set name`, `set name=value`, `set name = value`.
fn cmd_set(shell: &mut Shell<'_, '_>, args: &str) {
    let args = args.trim();
    let registry = shell.registry();

    if args.is_empty() || args == "*" {
        let with_bounds = args == "*";
        shell.print("Current settings: \r\n");
        for param in registry.iter() {
            shell.print_fmt(format_args!(
                "{} = {}\r\n",
                param.name(),
                param.format(with_bounds)
            ));
        }
        return;
    }

    let Some((name, text)) = args.split_once('=') else {
        // A bare name shows every parameter starting with it.
        let mut shown = false;
        for param in registry.with_prefix(args) {
            shell.print_fmt(format_args!(
                "{} = {}\r\n",
                param.name(),
                param.format(false)
            ));
            shown = true;
        }
        if !shown {
            shell.print(UNKNOWN_PARAMETER);
        }
        return;
    };

    let result = match registry.find(name.trim()) {
        Some(param) => {
            let text = text.trim().as_bytes();
            let value = if param.kind().is_float() {
                Value::Float(parse_float(text))
            } else {
                Value::Int(parse_int(text))
            };
            param.assign(value).map(|()| param)
        }
        None => Err(ParamError::UnknownName),
    };

    match result {
        Ok(param) => {
            shell.print_fmt(format_args!(
                "{} set to {}",
                param.name(),
                param.format(false)
            ));
        }
        Err(ParamError::OutOfRange) => shell.print(OUT_OF_RANGE),
        Err(_) => shell.print(UNKNOWN_PARAMETER),
    }
}

fn cmd_status(shell: &mut Shell<'_, '_>, _args: &str) {
    let (out, engine) = shell.split();
    engine.write_status(out);
}

fn cmd_version(shell: &mut Shell<'_, '_>, _args: &str) {
    let (out, engine) = shell.split();
    out.print(engine.firmware());
}

fn current_mixer(shell: &mut Shell<'_, '_>) -> Option<&'static str> {
    let engine = shell.engine();
    engine.mixer_names().get(engine.mixer()).copied()
}
