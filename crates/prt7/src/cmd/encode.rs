use bytes::BytesMut;
use prt7_frame::encode_message;

use crate::cmd::EncodeArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.text.is_empty() {
        return Err(CliError::new(USAGE, "text must not be empty"));
    }

    let mut wire = BytesMut::new();
    encode_message(&args.text, args.rotation, &mut wire);
    tracing::debug!(bytes = wire.len(), rotation = args.rotation, "message encoded");

    print_encoded(&wire, args.rotation, format);
    Ok(SUCCESS)
}
