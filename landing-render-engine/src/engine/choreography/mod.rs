//! Pure scroll-to-style mapping.
//!
//! Nothing in here touches the ECS or the DOM. Every function maps scroll
//! position, viewport height and item index to plain numbers; the page
//! adapter decides where those numbers are written.

/// Easing curves shared by the scroll mappers and the timed intro.
pub mod easing;

/// Hero parallax: content lift, fade and counter-moving background.
pub mod hero;

/// Stacked card deck, progress pips and flanking panel entrance.
pub mod card_deck;

/// Timed hero entrance tracks started by the readiness signal.
pub mod intro;
