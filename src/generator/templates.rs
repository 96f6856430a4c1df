//! WDL templates used by `init`.
//!
//! Keywords available to every template:
//!
//! - `task`: name of the task
//! - `prevtask`: name of the previous task (call-n only)
//! - `workflow`: workflow name as given on the command line
//! - `workflowname`: workflow name in lowercase
//! - `fullname`, `username`: from the OS account
//! - `namespace`: Docker namespace, prefixed with the registry when one is set
//! - `tag`: Docker image tag
//!
//! The packaging family makes every task zip its working directory and hand
//! the archive to the next task; the plain family leaves inputs and outputs
//! for the author to fill in.

/// One template per piece of a generated WDL file.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    pub task_1: &'static str,
    pub task_n: &'static str,
    pub workflow_start: &'static str,
    pub call_task_1: &'static str,
    pub call_task_n: &'static str,
    pub workflow_end: &'static str,
}

impl TemplateSet {
    pub fn for_packaging(package: bool) -> Self {
        if package {
            Self::packaging()
        } else {
            Self::plain()
        }
    }

    pub fn packaging() -> Self {
        Self {
            task_1: TASK_1_PKG,
            task_n: TASK_N_PKG,
            workflow_start: WORKFLOW_START_PKG,
            call_task_1: CALL_TASK_1_PKG,
            call_task_n: CALL_TASK_N_PKG,
            workflow_end: WORKFLOW_END_PKG,
        }
    }

    pub fn plain() -> Self {
        Self {
            task_1: TASK_PLAIN,
            task_n: TASK_PLAIN,
            workflow_start: WORKFLOW_START,
            call_task_1: CALL_TASK,
            call_task_n: CALL_TASK,
            workflow_end: WORKFLOW_END,
        }
    }
}

const TASK_1_PKG: &str = r#"task $task {
    Boolean package
    String null_file
    String package_name
    String package_archive="$${package_name}.zip"
    Int? local_disk_gb
    Int? num_preemptions

    #**Define additional inputs here**

    command {
        set -euo pipefail

        #**Command goes here**

        if $${package}; then
            /src/package.sh -x broad-institute-gdac/\* $${package_name}
        fi
    }

    output {
        File ${workflowname}_pkg="$${if package then package_archive else null_file}"
        #** Define additional outputs here**
    }

    runtime {
        docker : "$namespace/$task:$tag"
        disks : "local-disk $${if defined(local_disk_gb) then local_disk_gb else '10'} HDD"
        preemptible : "$${if defined(num_preemptions) then num_preemptions else '0'}"
    }

    meta {
        author : "$fullname"
        email : "$username@broadinstitute.org"
    }
}

"#;

const TASK_N_PKG: &str = r#"task $task {
    Boolean package
    String null_file
    File package_archive
    String package_name=basename(package_archive)
    Int? local_disk_gb
    Int? num_preemptions

    #**Define additional inputs here**

    command {
        set -euo pipefail

        #**Command goes here**

        if $${package}; then
            mv $${package_archive} .
            /src/package.sh -x broad-institute-gdac/\* $${package_name}
        fi
    }

    output {
        File ${workflowname}_pkg="$${if package then package_name else null_file}"
        #** Define additional outputs here**
    }

    runtime {
        docker : "$namespace/$task:$tag"
        disks : "local-disk $${if defined(local_disk_gb) then local_disk_gb else '10'} HDD"
        preemptible : "$${if defined(num_preemptions) then num_preemptions else '0'}"
    }

    meta {
        author : "$fullname"
        email : "$username@broadinstitute.org"
    }
}

"#;

const WORKFLOW_START_PKG: &str = r#"workflow $workflow {
    Boolean package
    String null_file="gs://broad-institute-gdac/GDAC_FC_NULL"
    String package_name="$workflowname""#;

const CALL_TASK_1_PKG: &str = r#"

    call $task {
        input: package=package,
               null_file=null_file,
               package_name=package_name
    }"#;

const CALL_TASK_N_PKG: &str = r#"

    call $task {
        input: package=package,
               null_file=null_file,
               package_archive=$prevtask.${workflowname}_pkg
    }"#;

const WORKFLOW_END_PKG: &str = r#"

    output {
        $task.${workflowname}_pkg
    }
}
"#;

const TASK_PLAIN: &str = r#"task $task {
    Int? local_disk_gb
    Int? num_preemptions

    #**Define additional inputs here**

    command {
        set -euo pipefail

        #**Command goes here**
    }

    output {
        #** Define outputs here**
    }

    runtime {
        docker : "$namespace/$task:$tag"
        disks : "local-disk $${if defined(local_disk_gb) then local_disk_gb else '10'} HDD"
        preemptible : "$${if defined(num_preemptions) then num_preemptions else '0'}"
    }

    meta {
        author : "$fullname"
        email : "$username@broadinstitute.org"
    }
}

"#;

const WORKFLOW_START: &str = "workflow $workflow {";

const CALL_TASK: &str = r#"

    call $task {
        input: #**Define call inputs for $task here**
    }"#;

const WORKFLOW_END: &str = r#"

    output {
        #**Define workflow outputs here. If defined, these will be the only
        #  outputs available in the Method Configuration**
    }
}
"#;
