//! `$UNIQ(n)` and `$COUNT` substitution for string attributes.
//!
//! - `$UNIQ(n)` becomes `n` random ASCII alphanumerics.
//! - `$COUNT` becomes the instantiation counter of the attribute.

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::{FactoryError, FactoryResult};

const UNIQ: &str = "$UNIQ(";
const COUNT: &str = "$COUNT";

/// Returns true if the string contains any placeholder.
pub fn has_placeholders(value: &str) -> bool {
	value.contains(UNIQ) || value.contains(COUNT)
}

/// Expands every placeholder in `template`.
///
/// # Example
///
/// ```
/// use factory_workers_core::factory::template::expand;
///
/// let login = expand("pirate_$COUNT", 7).unwrap();
/// assert_eq!(login, "pirate_7");
/// ```
pub fn expand(template: &str, count: u64) -> FactoryResult<String> {
	let mut output = String::with_capacity(template.len());
	let mut rest = template;

	while let Some(pos) = rest.find('$') {
		output.push_str(&rest[..pos]);
		let tail = &rest[pos..];

		if let Some(args) = tail.strip_prefix(UNIQ) {
			let close = args.find(')').ok_or_else(|| invalid(template, "unterminated $UNIQ("))?;
			let length = parse_length(template, &args[..close])?;
			output.push_str(&random_alphanumeric(length));
			rest = &args[close + 1..];
		} else if let Some(after) = tail.strip_prefix(COUNT) {
			output.push_str(&count.to_string());
			rest = after;
		} else {
			output.push('$');
			rest = &tail[1..];
		}
	}

	output.push_str(rest);
	Ok(output)
}

fn parse_length(template: &str, raw: &str) -> FactoryResult<usize> {
	match raw.trim().parse::<usize>() {
		Ok(0) => Err(invalid(template, "$UNIQ length must be positive")),
		Ok(length) => Ok(length),
		Err(_) => Err(invalid(
			template,
			&format!("$UNIQ length {:?} is not a number", raw),
		)),
	}
}

fn random_alphanumeric(length: usize) -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(length)
		.map(char::from)
		.collect()
}

fn invalid(template: &str, message: &str) -> FactoryError {
	FactoryError::InvalidTemplate {
		template: template.to_string(),
		message: message.to_string(),
	}
}
