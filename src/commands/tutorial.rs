//! Implementation of the `hydrant tutorial` command.

use crate::error::Result;

const TUTORIAL: &str = "
Hydrant aims to simplify and accelerate the development and maintenance of
workflows for FireCloud.

FireCloud brings together a substantial range of related technologies. For
researchers who are not software engineers, learning that stack can stand in
the way of the actual goal: sharing and exploring research data, and running
scientific codes upon that data, at scale.

The general process of using hydrant to migrate a code to FireCloud:

 Hydrant Cmd    Purpose + Followup Manual Steps (denoted by *)
 -----------    -------------------------------------------------------------
    init        Generate a workflow directory tree, with templated WDL
                        * copy/edit source code into task/src directory(ies)
                        * edit task/Dockerfile(s)

    build       Build a docker image from task/Dockerfile

    push        Store the local docker image in the remote Docker registry
                        * edit WDL

    validate    Verify syntax of WDL, and generate the JSON test file
                        * edit tests/inputs.json

    test        Run local Cromwell on WDL + docker image, using inputs.json

Configuration is read from ~/.hydrant/hydrant.cfg, then <workflow>/hydrant.cfg,
then <workflow>/<task>/hydrant.cfg, then the file given with --config; later
files override earlier ones key by key. `hydrant show-config` prints the result.

Tasks of an existing workflow can be reused in a new one:

    hydrant init --tasks old_flow.align,old_flow.*,new_task new_flow
";

/// Execute the `hydrant tutorial` command.
pub fn cmd_tutorial() -> Result<()> {
    print!("{}", TUTORIAL);
    Ok(())
}
