/* Constants for user-facing text.
 * All messages are sent with Telegram's legacy Markdown parse mode.
 */

pub const APP_LINK: &str = "https://shorturl.at/A3o7u";

pub const SPAM_MESSAGE: &str = "⚠️ *Spam detected! Kripya firse koshish karein.*";
pub const AMOUNT_PROMPT_MESSAGE: &str =
    "🔹 *Aap kitne Paws withdraw karna chahte hain?*\n(Min: 200, Max: 10,000)";
pub const ADDRESS_PROMPT_MESSAGE: &str =
    "💰 *Apna Paws Address bhejein:*\n(Ex: `/pawsaddress XYZ123`)";
pub const INVALID_RANGE_MESSAGE: &str = "❌ *Invalid range! Use 200-10,000 Paws.*";
pub const INVALID_NUMBER_MESSAGE: &str = "❌ *Please enter a valid number!*";
pub const INVALID_ADDRESS_MESSAGE: &str =
    "❌ *Galat format!* Kripya `/pawsaddress XYZ123` jaisa format use karein.";
