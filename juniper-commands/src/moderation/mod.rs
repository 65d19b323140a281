pub mod ban;
pub mod case;
pub mod kick;
pub mod modlogs;
pub mod mute;
pub mod nuke;
pub mod purge;
pub mod timeout;
pub mod unmute;
pub mod untimeout;
pub mod warn;

pub(crate) mod embeds;
pub mod logging;
