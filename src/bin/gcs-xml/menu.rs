use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use anyhow::Result;
use gcs_xml::{
    AclEntry, AclPermission, AclScopeType, BucketOperations, CannedAcl, Commands, CopyObjectInput,
    CorsRule, CreateBucketInput, DeleteOutcome, DownloadObjectInput, LocationConstraint,
    ObjectOperations, ObjectPath, Response, Scope, UploadObjectInput, format,
    types::DEFAULT_CORS_MAX_AGE_SECS, validate_bucket_name,
};

use crate::prompt::Prompt;

pub const MENU: &str = "
         ***** Project Operations *****
         p1 -- GET Service          -- List Buckets in a Project

         ***** Bucket Operations  *****
         b1 -- GET Bucket           -- List objects in a bucket
         b2 -- PUT Bucket           -- Create a bucket. (RW or FC scope)
         b3 -- DELETE Bucket        -- Delete a bucket. (RW or FC scope)
         b4 -- GET Bucket CORS      -- Get a bucket CORS. (FC scope)
         b5 -- SET Bucket CORS      -- Set a bucket CORS. (FC scope)
         b6 -- GET Bucket Location  -- Get a bucket location. (FC scope)

         ***** Object Operations  *****
         o1 -- PUT Object           -- Upload an object
         o2 -- GET Object           -- Download an object
         o3 -- PUT Object           -- Copy an object to another bucket
         o4 -- PUT Object           -- Update an object's ACLs
         o5 -- GET Object           -- Get an object ACLs
         o6 -- HEAD Object          -- Get an object metadata
         o7 -- DELETE Object        -- Delete an object

         ***** Support Operations  *****
         s1 -- Change scope         -- Change application scope.
         s2 -- Get app data         -- Display application data.

         Make your selection. Enter to clear or X to exit.
";

const APP_DATA_BANNER: &str = "<---------- Application data ------------->";
const OBJECT_PATH_LABEL: &str = "Object path (in the format gs://bucketname/objectname): ";

/// Shows the menu and runs selections until `X` or end of input. Operation
/// errors are printed and the loop continues.
pub fn run<B, O, R, W>(commands: &mut Commands<B, O>, prompt: &mut Prompt<R, W>) -> Result<()>
where
    B: BucketOperations,
    O: ObjectOperations,
    R: BufRead,
    W: Write,
{
    loop {
        prompt.print(MENU)?;
        let choice = match prompt.ask("\t >>> ") {
            Ok(choice) => choice,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("x") {
            return Ok(());
        }
        if choice.is_empty() {
            continue;
        }

        if let Err(err) = execute(commands, prompt, choice) {
            if let Some(io_err) = err.downcast_ref::<io::Error>()
                && io_err.kind() == io::ErrorKind::UnexpectedEof
            {
                return Ok(());
            }
            tracing::debug!(error = ?err, choice, "operation failed");
            prompt.say(format_args!("Error: {err}"))?;
        }
    }
}

fn execute<B, O, R, W>(
    commands: &mut Commands<B, O>,
    prompt: &mut Prompt<R, W>,
    choice: &str,
) -> Result<()>
where
    B: BucketOperations,
    O: ObjectOperations,
    R: BufRead,
    W: Write,
{
    match choice {
        "p1" => show(prompt, &commands.list_buckets()?, true),
        "b1" => {
            let bucket = prompt.ask("Bucket name: ")?;
            prompt.say(format_args!("List objects contained in the bucket \"{bucket}\"."))?;
            show(prompt, &commands.list_objects(&bucket)?, true)
        }
        "b2" => create_bucket(commands, prompt),
        "b3" => {
            let bucket = prompt.ask("Bucket: ")?;
            let answer = prompt.confirm(&format!(
                "Are you sure you want to delete the bucket: {bucket} ?: "
            ))?;
            match commands.delete_bucket(&bucket, &answer)? {
                DeleteOutcome::Deleted(resp) => {
                    prompt.say(format_args!("Bucket {bucket} deleted."))?;
                    show(prompt, &resp, true)
                }
                DeleteOutcome::Aborted => {
                    prompt.say(format_args!("Bucket {bucket} not deleted. Bye!"))?;
                    Ok(())
                }
            }
        }
        "b4" => {
            let bucket = prompt.ask("Bucket name: ")?;
            prompt.say(format_args!("Get bucket \"{bucket}\" CORS."))?;
            show(prompt, &commands.get_bucket_cors(&bucket)?, true)
        }
        "b5" => {
            let bucket = prompt.ask("Bucket name: ")?;
            let origins = prompt.ask(
                "Cross origins. Separate origins with comma. Enter for default value *: ",
            )?;
            let methods = prompt.ask(
                "Cross origins methods. Separate methods with comma. Enter for default value GET: ",
            )?;
            let headers = prompt.ask(
                "Response headers. Separate headers with comma. Enter for default value GCS-Demo: ",
            )?;
            let max_age = prompt.ask(&format!(
                "Max age in seconds. Enter for default value {DEFAULT_CORS_MAX_AGE_SECS}: "
            ))?;
            let rule = CorsRule::from_lists(&origins, &methods, &headers, &max_age);
            show(prompt, &commands.set_bucket_cors(&bucket, &rule)?, true)
        }
        "b6" => {
            let bucket = prompt.ask("Bucket name: ")?;
            prompt.say(format_args!("Get bucket \"{bucket}\" location."))?;
            show(prompt, &commands.get_bucket_location(&bucket)?, true)
        }
        "o1" => {
            let file = prompt.ask("File path (in the format dir/filename): ")?;
            let destination = ObjectPath::parse(&prompt.ask(
                "Target object path (in the format gs://bucketname/objectname): ",
            )?)?;
            let acl = ask_choice::<CannedAcl, _, _>(
                prompt,
                "Object ACL. Enter for private.",
                &CannedAcl::ALL.map(CannedAcl::as_str),
            )?;
            let input = UploadObjectInput {
                file: PathBuf::from(file),
                destination,
                acl: Some(acl),
            };
            show(prompt, &commands.upload_object(&input)?, true)
        }
        "o2" => {
            let file = prompt.ask("Destination file path (in the format dir/filename): ")?;
            let source = ObjectPath::parse(&prompt.ask(
                "Object to download path (in the format gs://bucketname/objectname): ",
            )?)?;
            let input = DownloadObjectInput {
                source,
                file: PathBuf::from(file),
            };
            show(prompt, &commands.download_object(&input)?, false)
        }
        "o3" => {
            let source_bucket = prompt.ask("Source bucket name: ")?;
            let source_object = prompt.ask("Name of the object to copy: ")?;
            let target_bucket = prompt.ask("Target bucket name: ")?;
            let target_object = prompt.ask("Target object name. Enter for the same name: ")?;
            let acl = ask_choice::<CannedAcl, _, _>(
                prompt,
                "Object ACL. Enter for private.",
                &CannedAcl::ALL.map(CannedAcl::as_str),
            )?;

            let input = CopyObjectInput::new(source_bucket, source_object, target_bucket)
                .with_target_object(target_object)
                .with_acl(acl);
            let resp = commands.copy_object(&input)?;
            show(prompt, &resp, true)?;
            prompt.say(format_args!(
                "Object {} has been copied into object {}",
                input.source_object,
                input.resolved_target_object()
            ))?;
            Ok(())
        }
        "o4" => {
            let path = ObjectPath::parse(&prompt.ask(OBJECT_PATH_LABEL)?)?;
            let scope_type = ask_choice::<AclScopeType, _, _>(
                prompt,
                "Object ACL scope. Enter for UserByEmail.",
                &AclScopeType::ALL.map(AclScopeType::as_str),
            )?;
            let email = prompt.ask("User or group email: ")?;
            let permission = ask_choice::<AclPermission, _, _>(
                prompt,
                "Object ACL. Enter for READ.",
                &AclPermission::ALL.map(AclPermission::as_str),
            )?;
            let entry = AclEntry::new(permission, scope_type, email);
            show(prompt, &commands.set_object_acl(&path, &entry)?, true)
        }
        "o5" => {
            let path = ObjectPath::parse(&prompt.ask(OBJECT_PATH_LABEL)?)?;
            show(prompt, &commands.get_object_acl(&path)?, true)
        }
        "o6" => {
            let path = ObjectPath::parse(&prompt.ask(OBJECT_PATH_LABEL)?)?;
            show(prompt, &commands.get_object_metadata(&path)?, true)
        }
        "o7" => {
            let path = ObjectPath::parse(&prompt.ask(OBJECT_PATH_LABEL)?)?;
            let answer = prompt.confirm(&format!(
                "Are you sure you want to delete the object: {} ?: ",
                path.key
            ))?;
            match commands.delete_object(&path, &answer)? {
                DeleteOutcome::Deleted(resp) => show(prompt, &resp, true),
                DeleteOutcome::Aborted => {
                    prompt.say(format_args!("Object {} not deleted. Bye!", path.key))?;
                    Ok(())
                }
            }
        }
        "s1" => {
            prompt.say("Change authentication scope.")?;
            let keys: Vec<&str> = Scope::ALL.iter().map(|s| s.key()).collect();
            let scope: Scope = prompt.ask(&format!("Scope: {keys:?}: "))?.parse()?;
            commands.change_scope(scope)?;
            prompt.say(format_args!("Assigned scope: {}", scope.url()))?;
            Ok(())
        }
        "s2" => {
            prompt.say(APP_DATA_BANNER)?;
            for (key, value) in commands.app_data() {
                prompt.say(format_args!("{key} : {value}"))?;
            }
            Ok(())
        }
        _ => {
            prompt.say("Invalid Choice")?;
            Ok(())
        }
    }
}

fn create_bucket<B, O, R, W>(commands: &Commands<B, O>, prompt: &mut Prompt<R, W>) -> Result<()>
where
    B: BucketOperations,
    O: ObjectOperations,
    R: BufRead,
    W: Write,
{
    prompt.say("Enter required values ....")?;
    let name = loop {
        let name = prompt.ask("Bucket name: ")?;
        match validate_bucket_name(&name) {
            Ok(()) => break name,
            Err(err) => prompt.say(format_args!("Error: {err}"))?,
        }
    };

    let acl = ask_choice::<CannedAcl, _, _>(
        prompt,
        "Bucket ACL. Enter for private. No quotes, please.",
        &CannedAcl::ALL.map(CannedAcl::as_str),
    )?;
    let location = ask_choice::<LocationConstraint, _, _>(
        prompt,
        "Bucket Location. Enter for USA. No quotes, please.",
        &LocationConstraint::ALL.map(LocationConstraint::label),
    )?;

    let input = CreateBucketInput::new(&name)
        .with_acl(acl)
        .with_location(location);
    let resp = commands.create_bucket(&input)?;
    prompt.say(format_args!("Bucket {name} created."))?;
    show(prompt, &resp, true)
}

/// Asks for one of `choices`; blank input selects `T::default()`.
fn ask_choice<T, R, W>(prompt: &mut Prompt<R, W>, label: &str, choices: &[&str]) -> Result<T>
where
    T: FromStr<Err = gcs_xml::Error> + Default,
    R: BufRead,
    W: Write,
{
    let answer = prompt.ask(&format!("{label}\n {choices:?}: "))?;
    if answer.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(answer.parse()?)
}

fn show<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    resp: &Response,
    include_body: bool,
) -> Result<()> {
    prompt.print(&format::render_response(resp, include_body))?;
    Ok(())
}
