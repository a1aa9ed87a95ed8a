pub struct ScratchTemplate;

impl ClassTemplate for ScratchTemplate {}

/*<code>
fn scratch() {}
</code>*/
