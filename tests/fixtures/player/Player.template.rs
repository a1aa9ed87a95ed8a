//! Template for the Player component.
use scriptgen_templates::ClassTemplate;

pub struct PlayerTemplate;

impl ClassTemplate for PlayerTemplate {}

/*<name>Player</name>*/

/*<code>
pub struct Player {
    pub health: u32,
}
</code>*/
